use std::time::Instant;

use csv::StringRecord;

use crate::storage::{BackendLocal, StorageManager};

use super::{seed, CatalogError, CatalogFilter, CatalogReader, MemoryCatalog, Product};

const CSV_HEADERS: [&str; 13] = [
    "id",
    "name",
    "description",
    "price",
    "currency",
    "image_url",
    "tags",
    "category",
    "subcategory",
    "brand",
    "stock",
    "rating",
    "review_count",
];

/// Catalog stored as `catalog.csv`. The `tags` column holds a JSON array.
///
/// Every read goes back to disk, so edits to the file are picked up by the
/// next query without a restart.
#[derive(Debug, Clone)]
pub struct CatalogCsv {
    store: BackendLocal,
    ident: String,
}

impl CatalogCsv {
    /// Opens the catalog, creating it with the demo products when missing.
    pub fn open(store: BackendLocal, ident: &str) -> Result<Self, CatalogError> {
        let catalog = CatalogCsv {
            store,
            ident: ident.to_string(),
        };

        if !catalog.store.exists(ident) {
            log::info!(
                "Creating new catalog at {}",
                catalog.store.path_of(ident).display()
            );
            catalog.save(&seed::demo_products())?;
        }

        Ok(catalog)
    }

    /// Reads every decodable row. Rows that fail to decode are skipped.
    pub fn load(&self) -> Result<Vec<Product>, CatalogError> {
        let now = Instant::now();
        let data = self.store.read(&self.ident)?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_slice());

        let mut products = vec![];
        for (idx, record) in csv_reader.records().enumerate() {
            // header is line 1
            let line = idx + 2;
            let decoded = record
                .map_err(CatalogError::from)
                .and_then(|record| decode_record(&record))
                .and_then(Product::validated);

            match decoded {
                Ok(product) => products.push(product),
                Err(err) => log::warn!("{}: skipping line {line}: {err}", self.ident),
            }
        }

        log::debug!(
            "took {}ms to read {} products",
            now.elapsed().as_micros() as f64 / 1000.0,
            products.len()
        );

        Ok(products)
    }

    pub fn save(&self, products: &[Product]) -> Result<(), CatalogError> {
        let mut csv_wrt = csv::Writer::from_writer(vec![]);
        csv_wrt.write_record(CSV_HEADERS)?;
        for product in products {
            csv_wrt.write_record([
                product.id.clone(),
                product.name.clone(),
                product.description.clone(),
                product.price.to_string(),
                product.currency.clone(),
                product.image_url.clone().unwrap_or_default(),
                serde_json::to_string(&product.tags)?,
                product.category.clone(),
                product.subcategory.clone().unwrap_or_default(),
                product.brand.clone().unwrap_or_default(),
                product.stock.to_string(),
                product.rating.map(|r| r.to_string()).unwrap_or_default(),
                product
                    .review_count
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            ])?;
        }

        let data = csv_wrt
            .into_inner()
            .map_err(|err| CatalogError::Io(err.into_error()))?;
        self.store.write(&self.ident, &data)?;
        Ok(())
    }

    /// Replaces the catalog contents with the demo products.
    pub fn reseed(&self) -> Result<usize, CatalogError> {
        let products = seed::demo_products();
        self.save(&products)?;
        Ok(products.len())
    }

    /// Loads the current contents into an immutable in-memory catalog.
    pub fn snapshot(&self) -> Result<MemoryCatalog, CatalogError> {
        Ok(MemoryCatalog::new(self.load()?))
    }
}

impl CatalogReader for CatalogCsv {
    fn fetch_candidates(&self, filter: &CatalogFilter) -> Result<Vec<Product>, CatalogError> {
        Ok(filter.apply(self.load()?))
    }
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> Result<&'a str, CatalogError> {
    record
        .get(idx)
        .ok_or_else(|| CatalogError::InvalidRecord(format!("missing column {}", CSV_HEADERS[idx])))
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_number<T: std::str::FromStr>(record: &StringRecord, idx: usize) -> Result<T, CatalogError>
where
    T::Err: std::fmt::Display,
{
    let value = field(record, idx)?;
    value.trim().parse::<T>().map_err(|err| {
        CatalogError::InvalidRecord(format!("{} {value:?}: {err}", CSV_HEADERS[idx]))
    })
}

fn parse_optional_number<T: std::str::FromStr>(
    record: &StringRecord,
    idx: usize,
) -> Result<Option<T>, CatalogError>
where
    T::Err: std::fmt::Display,
{
    if field(record, idx)?.trim().is_empty() {
        return Ok(None);
    }
    parse_number(record, idx).map(Some)
}

fn decode_record(record: &StringRecord) -> Result<Product, CatalogError> {
    let tags_raw = field(record, 6)?;
    let tags = if tags_raw.trim().is_empty() {
        vec![]
    } else {
        serde_json::from_str::<Vec<String>>(tags_raw)
            .map_err(|err| CatalogError::InvalidRecord(format!("tags {tags_raw:?}: {err}")))?
    };

    Ok(Product {
        id: field(record, 0)?.to_string(),
        name: field(record, 1)?.to_string(),
        description: field(record, 2)?.to_string(),
        price: parse_number(record, 3)?,
        currency: optional(field(record, 4)?).unwrap_or_else(|| "TL".to_string()),
        image_url: optional(field(record, 5)?),
        tags,
        category: field(record, 7)?.to_string(),
        subcategory: optional(field(record, 8)?),
        brand: optional(field(record, 9)?),
        stock: parse_number(record, 10)?,
        rating: parse_optional_number(record, 11)?,
        review_count: parse_optional_number(record, 12)?,
    })
}
