use crate::EventRecord;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Allow-listed events, shared between request handlers
///
/// Readers get an `Arc` snapshot, so a validation always sees one consistent
/// list even while the catalog is being replaced.
#[derive(Clone, Default)]
pub struct EventCatalog {
    events: Arc<RwLock<Arc<Vec<EventRecord>>>>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a JSON array of event records
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let events: Vec<EventRecord> = serde_json::from_str(&content)?;
        info!("Loaded {} events from {}", events.len(), path.display());

        let catalog = Self::new();
        catalog.replace(events).await;
        Ok(catalog)
    }

    pub async fn snapshot(&self) -> Arc<Vec<EventRecord>> {
        self.events.read().await.clone()
    }

    pub async fn replace(&self, events: Vec<EventRecord>) {
        let mut current = self.events.write().await;
        *current = Arc::new(events);
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventId;

    #[tokio::test]
    async fn test_replace_does_not_disturb_existing_snapshot() {
        let catalog = EventCatalog::new();
        catalog
            .replace(vec![EventRecord::new(EventId::number(1)), EventRecord::new(EventId::number(2))])
            .await;

        let before = catalog.snapshot().await;
        catalog.replace(vec![EventRecord::new(EventId::number(3))]).await;

        assert_eq!(before.len(), 2);
        assert_eq!(catalog.len().await, 1);
        assert_eq!(catalog.snapshot().await[0].id, EventId::number(3));
    }

    #[tokio::test]
    async fn test_load_reads_json_array() {
        let path = std::env::temp_dir().join(format!("pollgate-events-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"[{"id": 5, "name": "Devcon"}, {"id": "special"}]"#)
            .await
            .unwrap();

        let catalog = EventCatalog::load(&path).await.unwrap();
        let events = catalog.snapshot().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, EventId::number(5));
        assert_eq!(events[0].details["name"], "Devcon");
        assert_eq!(events[1].id, EventId::Text("special".to_string()));
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        assert!(EventCatalog::load("/nonexistent/pollgate/events.json").await.is_err());
    }
}
