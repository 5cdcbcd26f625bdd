mod common;

use common::memory_store;
use media_sweep_core::collectors::{
    CatalogImages, CmsContent, CollectOptions, Collector, MegaMenu, ReferenceCollector,
    RichDescriptions, StaticFeatures, StoreConfig, WholeStoreScan, MEGA_MENU,
};
use media_sweep_core::storage::SqliteStore;
use media_sweep_core::{ExtractionMode, Pipeline, ReferenceSet, ReferenceSetBuilder, SilentReporter};

fn run(collector: &dyn Collector, store: &SqliteStore, mode: ExtractionMode) -> (usize, ReferenceSet) {
    let mut builder = ReferenceSetBuilder::new(Pipeline::new(mode));
    let values = collector.collect(store, &mut builder);
    (values, builder.build())
}

#[test]
fn test_product_images_are_qualified() {
    let store = memory_store(
        "INSERT INTO catalog_product_entity_varchar (attribute_id, entity_id, value) VALUES
            (1, 10, '/a/b/pic.png'),
            (2, 10, '/a/b/pic_small.png'),
            (9, 10, '/x/y/not_an_image_attribute.png'),
            (1, 11, NULL),
            (3, 11, '');
         INSERT INTO catalog_product_entity_media_gallery (attribute_id, value) VALUES
            (90, '/c/d/gallery.jpg');",
    );
    let (values, refs) = run(&CatalogImages::products(), &store, ExtractionMode::Intensive);

    assert_eq!(values, 3);
    assert!(refs.contains_key("catalog/product/a/b/pic.png"));
    assert!(refs.contains_key("catalog/product/a/b/pic_small.png"));
    assert!(refs.contains_key("catalog/product/c/d/gallery.jpg"));
    assert!(refs.contains_key("a/b/pic.png"));
    assert!(!refs.contains_key("catalog/product/x/y/not_an_image_attribute.png"));
}

#[test]
fn test_category_images_are_qualified() {
    let store = memory_store(
        "INSERT INTO catalog_category_entity_varchar (attribute_id, entity_id, value) VALUES
            (6, 3, 'Banner.JPG');",
    );
    let (_, refs) = run(&CatalogImages::categories(), &store, ExtractionMode::Fast);
    assert!(refs.contains_key("catalog/category/banner.jpg"));
}

#[test]
fn test_cms_content_and_page_builder() {
    let store = memory_store(
        r#"INSERT INTO cms_page (title, content) VALUES
            ('Home', '<p>{{media url="wysiwyg/home/hero.jpg"}}</p>
                      <div data-content-type="row" data-background-images="{&quot;desktop_image&quot;:&quot;promo/desktop.jpg&quot;}"></div>');
           INSERT INTO cms_block (title, content) VALUES
            ('Footer', '<img srcset="/media/wysiwyg/f-1x.png 1x, /media/wysiwyg/f-2x.png 2x">'),
            ('Empty', NULL);"#,
    );
    let (values, refs) = run(&CmsContent, &store, ExtractionMode::Fast);

    assert_eq!(values, 2);
    assert!(refs.contains_key("wysiwyg/home/hero.jpg"));
    assert!(refs.contains_key("promo/desktop.jpg"));
    assert!(refs.contains_key("wysiwyg/f-1x.png"));
    assert!(refs.contains_key("wysiwyg/f-2x.png"));
}

#[test]
fn test_quoted_link_with_space_in_file_name() {
    let store = memory_store(
        r#"INSERT INTO cms_page (title, content) VALUES
            ('Guides', '<div data-content-type="row"><a href="/media/wysiwyg/My Guide.png">guide</a></div>');"#,
    );
    let (_, refs) = run(&CmsContent, &store, ExtractionMode::Fast);
    assert!(refs.contains_key("wysiwyg/my guide.png"));
}

#[test]
fn test_rich_descriptions() {
    let store = memory_store(
        r#"INSERT INTO catalog_product_entity_text (attribute_id, entity_id, value) VALUES
            (4, 10, '<img src="/media/wysiwyg/desc/long.png">'),
            (5, 10, '<p style="background-image: url(''/media/wysiwyg/desc/short.png'')"></p>');
           INSERT INTO catalog_category_entity_text (attribute_id, entity_id, value) VALUES
            (7, 3, '<img data-src="https://shop.test/pub/media/wysiwyg/desc/cat.png">');"#,
    );
    let (_, refs) = run(&RichDescriptions, &store, ExtractionMode::Fast);

    assert!(refs.contains_key("wysiwyg/desc/long.png"));
    assert!(refs.contains_key("wysiwyg/desc/short.png"));
    assert!(refs.contains_key("wysiwyg/desc/cat.png"));
}

#[test]
fn test_store_config_upload_dirs_and_fallback() {
    let store = memory_store(
        "INSERT INTO core_config_data (path, value) VALUES
            ('design/header/logo_src', 'stores/1/logo.svg'),
            ('design/email/logo', 'default/mail.png'),
            ('sales/identity/logo', 'default/invoice.png'),
            ('design/head/shortcut_icon', 'default/favicon.ico'),
            ('theme/footer/logo_image', 'footer/brand.png'),
            ('web/secure/base_url', 'https://shop.test/');",
    );
    let (values, refs) = run(&StoreConfig, &store, ExtractionMode::Fast);

    assert!(refs.contains_key("logo/stores/1/logo.svg"));
    assert!(refs.contains_key("email/logo/default/mail.png"));
    assert!(refs.contains_key("sales/store/logo/default/invoice.png"));
    assert!(refs.contains_key("favicon/default/favicon.ico"));
    assert!(refs.contains_key("footer/brand.png"));
    // Logo paths also match the fallback patterns and are read twice.
    assert_eq!(values, 8);
}

#[test]
fn test_whole_store_scan_intensive_vs_fast() {
    let rows = r#"CREATE TABLE widget_instance (
            instance_id INTEGER PRIMARY KEY,
            widget_parameters TEXT,
            sort_order INTEGER
        );
        INSERT INTO widget_instance (widget_parameters, sort_order) VALUES
            ('{"image":"wysiwyg\/widgets\/w1.png","title":"Sale"}', 1),
            ('a:1:{s:5:"image";s:25:"%2Fmedia%2Fbanner%2Fb.png";}', 2),
            ('nothing to see here', 3);"#;

    let (intensive_values, intensive) =
        run(&WholeStoreScan, &memory_store(rows), ExtractionMode::Intensive);
    assert_eq!(intensive_values, 2);
    assert!(intensive.contains_key("wysiwyg/widgets/w1.png"));
    assert!(intensive.contains_key("banner/b.png"));

    let (_, fast) = run(&WholeStoreScan, &memory_store(rows), ExtractionMode::Fast);
    assert!(!fast.contains_key("wysiwyg/widgets/w1.png"));
    assert!(!fast.contains_key("banner/b.png"));
}

#[test]
fn test_mega_menu_sources() {
    let store = memory_store(
        r#"CREATE TABLE amasty_megamenu_link (entity_id INTEGER PRIMARY KEY, content TEXT);
           INSERT INTO amasty_megamenu_link (content) VALUES
            ('<img src="https://shop.test/media/amasty/megamenu/icon.png">');
           INSERT INTO core_config_data (path, value) VALUES
            ('amasty_megamenu/general/icon', 'wysiwyg/menu/settings.svg');
           INSERT INTO catalog_category_entity_varchar (attribute_id, entity_id, value) VALUES
            (8, 3, '/media/wysiwyg/menu/cat.png');"#,
    );
    let (_, refs) = run(&MegaMenu, &store, ExtractionMode::Fast);

    assert!(refs.contains_key("amasty/megamenu/icon.png"));
    assert!(refs.contains_key("wysiwyg/menu/settings.svg"));
    assert!(refs.contains_key("wysiwyg/menu/cat.png"));
}

#[test]
fn test_mega_menu_only_runs_when_enabled() {
    let rows = r#"CREATE TABLE amasty_megamenu_link (entity_id INTEGER PRIMARY KEY, content TEXT);
        INSERT INTO amasty_megamenu_link (content) VALUES ('/media/wysiwyg/menu/only-here.png');"#;
    let options = CollectOptions {
        scan_whole_store: false,
    };

    let collect = |features: StaticFeatures| {
        let store = memory_store(rows);
        let mut builder = ReferenceSetBuilder::new(Pipeline::new(ExtractionMode::Fast));
        ReferenceCollector::new(options, &features).collect_all(&store, &mut builder, &SilentReporter);
        builder.build()
    };

    assert!(!collect(StaticFeatures::default()).contains_key("wysiwyg/menu/only-here.png"));
    assert!(collect(StaticFeatures::new([MEGA_MENU])).contains_key("wysiwyg/menu/only-here.png"));
}

#[test]
fn test_failing_source_is_skipped() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE cms_page (page_id INTEGER PRIMARY KEY, content TEXT);
         CREATE TABLE cms_block (block_id INTEGER PRIMARY KEY, body TEXT);
         INSERT INTO cms_page (content) VALUES ('<img src=\"/media/wysiwyg/ok.png\">');
         INSERT INTO cms_block (body) VALUES ('<img src=\"/media/wysiwyg/lost.png\">');",
    )
    .unwrap();
    let store = SqliteStore::from_connection(conn).unwrap();

    let mut builder = ReferenceSetBuilder::new(Pipeline::new(ExtractionMode::Fast));
    ReferenceCollector::new(CollectOptions::default(), &StaticFeatures::default())
        .collect_all(&store, &mut builder, &SilentReporter);
    let refs = builder.build();

    assert!(refs.contains_key("wysiwyg/ok.png"));
    // cms_block has no content column; the whole-store scan still reads `body`.
    assert!(refs.contains_key("wysiwyg/lost.png"));
}
