use super::priced;
use crate::{
    catalog::{self, CatalogCsv, CatalogFilter, CatalogReader},
    storage::{BackendLocal, StorageManager},
};

const HEADER: &str =
    "id,name,description,price,currency,image_url,tags,category,subcategory,brand,stock,rating,review_count\n";

fn fresh_catalog() -> (CatalogCsv, BackendLocal, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let store = BackendLocal::new(tmp.path()).unwrap();
    let catalog = CatalogCsv::open(store.clone(), "catalog.csv").unwrap();
    (catalog, store, tmp)
}

#[test]
fn open_seeds_demo_catalog() {
    let (catalog, store, _tmp) = fresh_catalog();

    assert!(store.exists("catalog.csv"));
    let products = catalog.load().unwrap();
    assert_eq!(products.len(), 8);
    assert!(products.iter().all(|p| p.in_stock() && !p.tags.is_empty()));
}

#[test]
fn open_keeps_existing_catalog() {
    let (catalog, store, _tmp) = fresh_catalog();
    catalog
        .save(&[priced("only", &["derz"], 10.0, "yapi", 1)])
        .unwrap();

    let reopened = CatalogCsv::open(store, "catalog.csv").unwrap();
    let products = reopened.load().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, "only");
}

#[test]
fn save_load_preserves_fields() {
    let (catalog, _store, _tmp) = fresh_catalog();
    let mut product = priced("p1", &["derz_dolgusu", "beyaz_derz"], 25.9, "Yapı Malzemeleri", 3);
    product.brand = Some("YapıMax".to_string());
    product.rating = Some(4.5);
    product.review_count = Some(12);
    product.description = "Çok amaçlı, \"su geçirmez\"".to_string();

    catalog.save(&[product.clone()]).unwrap();
    let loaded = catalog.load().unwrap();

    assert_eq!(loaded.len(), 1);
    let loaded = &loaded[0];
    assert_eq!(loaded.tags, product.tags);
    assert_eq!(loaded.description, product.description);
    assert_eq!(loaded.brand, product.brand);
    assert_eq!(loaded.rating, Some(4.5));
    assert_eq!(loaded.review_count, Some(12));
    assert_eq!(loaded.subcategory, None);
    assert!((loaded.price - 25.9).abs() < 1e-9);
}

#[test]
fn malformed_rows_are_skipped() {
    let (catalog, store, _tmp) = fresh_catalog();
    let data = format!(
        "{HEADER}\
         good,Good,,10,TL,,\"[\"\"Derz Dolgusu\"\"]\",yapi,,,5,,\n\
         bad_tags,Bad,,10,TL,,not json,yapi,,,5,,\n\
         bad_price,Bad,,abc,TL,,[],yapi,,,5,,\n\
         zero_price,Bad,,0,TL,,[],yapi,,,5,,\n\
         bad_rating,Bad,,10,TL,,[],yapi,,,5,9.5,\n\
         short,row\n\
         no_tags,Fine,,12,,,,yapi,,,1,,\n"
    );
    store.write("catalog.csv", data.as_bytes()).unwrap();

    let products = catalog.load().unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["good", "no_tags"]);
    assert_eq!(products[0].tags, vec!["derz_dolgusu"]);
    assert!(products[1].tags.is_empty());
    assert_eq!(products[1].currency, "TL");
}

#[test]
fn fetch_candidates_applies_filters() {
    let (catalog, _store, _tmp) = fresh_catalog();
    catalog
        .save(&[
            priced("a", &["derz"], 10.0, "yapi", 1),
            priced("b", &["derz"], 20.0, "yapi", 0),
            priced("c", &["derz"], 30.0, "banyo", 1),
            priced("d", &["derz"], 40.0, "yapi", 1),
        ])
        .unwrap();

    let all = catalog.fetch_candidates(&CatalogFilter::default()).unwrap();
    assert_eq!(all.len(), 3);

    let filtered = catalog
        .fetch_candidates(&CatalogFilter {
            min_price: Some(5.0),
            max_price: Some(35.0),
            category: Some("yapi".to_string()),
        })
        .unwrap();
    let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
}

#[test]
fn fetch_reads_fresh_data() {
    let (catalog, _store, _tmp) = fresh_catalog();
    let filter = CatalogFilter::default();
    assert_eq!(catalog.fetch_candidates(&filter).unwrap().len(), 8);

    catalog
        .save(&[priced("new", &["derz"], 10.0, "yapi", 1)])
        .unwrap();
    assert_eq!(catalog.fetch_candidates(&filter).unwrap().len(), 1);
}

#[test]
fn snapshot_is_frozen() {
    let (catalog, _store, _tmp) = fresh_catalog();
    let snapshot = catalog.snapshot().unwrap();

    catalog.save(&[]).unwrap();
    assert_eq!(snapshot.len(), 8);
    assert_eq!(
        snapshot
            .fetch_candidates(&CatalogFilter::default())
            .unwrap()
            .len(),
        8
    );
}

#[test]
fn demo_catalog_views() {
    let (catalog, _store, _tmp) = fresh_catalog();
    let products = catalog.load().unwrap();

    let top = catalog::top_rated(&products, 2);
    let ids: Vec<&str> = top.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["demo-yapistirici", "demo-derz-silikon"]);

    assert_eq!(
        catalog::categories(&products),
        vec!["Banyo", "Dekorasyon", "Temizlik", "Yapı Malzemeleri"]
    );

    let stats = catalog::stats(&products);
    assert_eq!(stats.products_count, 8);
    assert_eq!(stats.in_stock_count, 8);
    assert_eq!(stats.categories_count, 4);
}

#[test]
fn reseed_restores_demo_products() {
    let (catalog, _store, _tmp) = fresh_catalog();
    catalog.save(&[]).unwrap();
    assert!(catalog.load().unwrap().is_empty());

    assert_eq!(catalog.reseed().unwrap(), 8);
    assert_eq!(catalog.load().unwrap().len(), 8);
}
