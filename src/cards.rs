//! Saved product cards: descriptions of products a user photographed or
//! described, kept for later lookup by description.

use std::{
    sync::{Arc, RwLock},
    time::Instant,
};

use anyhow::{anyhow, bail};
use chrono::{SecondsFormat, Utc};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::{
    eid::Eid,
    storage::{BackendLocal, StorageManager},
    tags::normalize_tags,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub name_en: String,
    pub visual_representation: String,
    pub tags: Vec<String>,
    pub confidence_score: Option<f64>,
    pub category: Option<String>,
    /// RFC 3339, UTC.
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub visual_representation: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl CardCreate {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            bail!("name must not be empty");
        }
        if let Some(confidence) = self.confidence_score {
            if !(0.0..=1.0).contains(&confidence) {
                bail!("confidence_score must be between 0 and 1, got {confidence}");
            }
        }
        Ok(())
    }
}

pub trait CardStore: Send + Sync {
    fn create(&self, card: CardCreate) -> anyhow::Result<ProductCard>;
    /// Newest first.
    fn list(&self, limit: usize) -> anyhow::Result<Vec<ProductCard>>;
    /// Case-insensitive substring match on the visual description, name and
    /// description. Newest first.
    fn search_description(&self, query: &str, limit: usize) -> anyhow::Result<Vec<ProductCard>>;
}

const CSV_HEADERS: [&str; 9] = [
    "id",
    "name",
    "description",
    "name_en",
    "visual_representation",
    "tags",
    "confidence_score",
    "category",
    "created_at",
];

/// Cards kept in insertion order in memory and persisted to `cards.csv`.
#[derive(Debug, Clone)]
pub struct CardsCsv {
    store: BackendLocal,
    ident: String,
    list: Arc<RwLock<Vec<ProductCard>>>,
}

impl CardsCsv {
    pub fn open(store: BackendLocal, ident: &str) -> anyhow::Result<Self> {
        let exists = store.exists(ident);
        let cards = if exists {
            Self::read_all(&store, ident)?
        } else {
            log::info!("Creating new card list at {}", store.path_of(ident).display());
            vec![]
        };

        let mgr = CardsCsv {
            store,
            ident: ident.to_string(),
            list: Arc::new(RwLock::new(cards)),
        };
        if !exists {
            mgr.save()?;
        }

        Ok(mgr)
    }

    fn read_all(store: &BackendLocal, ident: &str) -> anyhow::Result<Vec<ProductCard>> {
        let now = Instant::now();
        let data = store.read(ident)?;
        let mut csv_reader = csv::Reader::from_reader(data.as_slice());

        let mut cards = vec![];
        for (idx, record) in csv_reader.records().enumerate() {
            // header is line 1
            let line = idx + 2;
            let decoded = record
                .map_err(anyhow::Error::from)
                .and_then(|record| decode_record(&record));

            match decoded {
                Ok(card) => cards.push(card),
                Err(err) => log::warn!("{ident}: skipping line {line}: {err}"),
            }
        }

        log::debug!(
            "took {}ms to read {} cards",
            now.elapsed().as_micros() as f64 / 1000.0,
            cards.len()
        );

        Ok(cards)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let cards = self
            .list
            .read()
            .map_err(|_| anyhow!("card list lock poisoned"))?;
        self.write_all(&cards)
    }

    fn write_all(&self, cards: &[ProductCard]) -> anyhow::Result<()> {
        let mut csv_wrt = csv::Writer::from_writer(vec![]);
        csv_wrt.write_record(CSV_HEADERS)?;
        for card in cards.iter() {
            csv_wrt.write_record([
                &card.id,
                &card.name,
                &card.description,
                &card.name_en,
                &card.visual_representation,
                &serde_json::to_string(&card.tags)?,
                &card
                    .confidence_score
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                &card.category.clone().unwrap_or_default(),
                &card.created_at,
            ])?;
        }

        let data = csv_wrt.into_inner().map_err(|err| err.into_error())?;
        self.store.write(&self.ident, &data)?;
        Ok(())
    }

    fn newest_first<F>(&self, limit: usize, keep: F) -> anyhow::Result<Vec<ProductCard>>
    where
        F: Fn(&ProductCard) -> bool,
    {
        let cards = self
            .list
            .read()
            .map_err(|_| anyhow!("card list lock poisoned"))?;

        Ok(cards
            .iter()
            .rev()
            .filter(|card| keep(card))
            .take(limit)
            .cloned()
            .collect())
    }
}

impl CardStore for CardsCsv {
    fn create(&self, card_create: CardCreate) -> anyhow::Result<ProductCard> {
        card_create.validate()?;

        let card = ProductCard {
            id: Eid::new().to_string(),
            name: card_create.name.trim().to_string(),
            description: card_create.description,
            name_en: card_create.name_en,
            visual_representation: card_create.visual_representation,
            tags: normalize_tags(&card_create.tags),
            confidence_score: card_create.confidence_score,
            category: card_create.category.filter(|c| !c.trim().is_empty()),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let mut cards = self
            .list
            .write()
            .map_err(|_| anyhow!("card list lock poisoned"))?;

        // keep the list unchanged unless the file was written
        let mut updated = cards.clone();
        updated.push(card.clone());
        self.write_all(&updated)?;
        *cards = updated;

        Ok(card)
    }

    fn list(&self, limit: usize) -> anyhow::Result<Vec<ProductCard>> {
        self.newest_first(limit, |_| true)
    }

    fn search_description(&self, query: &str, limit: usize) -> anyhow::Result<Vec<ProductCard>> {
        let query = query.trim().to_lowercase();
        self.newest_first(limit, |card| {
            [&card.visual_representation, &card.name, &card.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
        })
    }
}

fn decode_record(record: &StringRecord) -> anyhow::Result<ProductCard> {
    let field = |idx: usize| {
        record
            .get(idx)
            .map(str::to_string)
            .ok_or(anyhow!("couldnt get card {}", CSV_HEADERS[idx]))
    };
    let optional = |idx: usize| field(idx).map(|v| if v.is_empty() { None } else { Some(v) });

    let tags = field(5)?;
    let tags: Vec<String> = if tags.is_empty() {
        vec![]
    } else {
        serde_json::from_str(&tags)?
    };

    Ok(ProductCard {
        id: field(0)?,
        name: field(1)?,
        description: field(2)?,
        name_en: field(3)?,
        visual_representation: field(4)?,
        tags,
        confidence_score: optional(6)?.map(|c| c.parse::<f64>()).transpose()?,
        category: optional(7)?,
        created_at: field(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, visual: &str) -> CardCreate {
        CardCreate {
            name: name.to_string(),
            visual_representation: visual.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate() {
        assert!(create("", "").validate().is_err());
        assert!(CardCreate {
            confidence_score: Some(1.5),
            ..create("kulaklik", "")
        }
        .validate()
        .is_err());
        assert!(create("kulaklik", "").validate().is_ok());
    }

    #[test]
    fn test_decode_empty_optionals() {
        let record = StringRecord::from(vec![
            "01J", "name", "", "", "", "", "", "", "2024-01-01T00:00:00.000Z",
        ]);
        let card = decode_record(&record).unwrap();
        assert!(card.tags.is_empty());
        assert_eq!(card.confidence_score, None);
        assert_eq!(card.category, None);
    }
}
