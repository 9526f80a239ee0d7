use mongodb::{Client, Collection, bson::doc};
use futures::TryStreamExt;

use crate::dbs::mongo::models::MongoMessage;
use crate::error::Result;
use crate::models::{StoredMessage, ThreadKey};

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    fn filter(key: ThreadKey) -> mongodb::bson::Document {
        doc! { "conversation_id": key.conversation_id, "thread_id": key.thread_id }
    }

    pub async fn append(&self, key: ThreadKey, message: StoredMessage) -> Result<()> {
        self.collection.insert_one(MongoMessage::from_stored(key, message)).await?;
        Ok(())
    }

    /// Whole log, oldest insert first (ObjectIds are generated in insertion order)
    pub async fn load(&self, key: ThreadKey) -> Result<Vec<StoredMessage>> {
        let documents: Vec<MongoMessage> = self.collection
            .find(Self::filter(key))
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(MongoMessage::into_stored).collect()
    }

    pub async fn delete(&self, key: ThreadKey) -> Result<()> {
        self.collection.delete_many(Self::filter(key)).await?;
        Ok(())
    }

    /// Delete then re-insert; two round trips, not a transaction
    pub async fn replace(&self, key: ThreadKey, messages: Vec<StoredMessage>) -> Result<()> {
        self.delete(key).await?;
        if messages.is_empty() {
            return Ok(());
        }
        let documents: Vec<MongoMessage> = messages
            .into_iter()
            .map(|m| MongoMessage::from_stored(key, m))
            .collect();
        self.collection.insert_many(documents).await?;
        Ok(())
    }
}
