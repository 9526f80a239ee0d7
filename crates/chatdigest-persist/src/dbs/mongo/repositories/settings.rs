use mongodb::{Client, Collection, bson::{doc, Bson, Document}};

use crate::dbs::mongo::models::MongoSummaryState;
use crate::error::Result;
use crate::models::{timestamp, SettingUpdate, StoredSettings};

#[derive(Clone)]
pub struct MongoSettingsRepository {
    collection: Collection<MongoSummaryState>,
}

impl MongoSettingsRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("summary_state");
        Self { collection }
    }

    pub async fn load(&self, conversation_id: i64) -> Result<StoredSettings> {
        match self.collection.find_one(doc! { "_id": conversation_id }).await? {
            Some(state) => state.into_stored(),
            None => Ok(StoredSettings::default()),
        }
    }

    /// Set one field, creating the settings document on first write
    pub async fn update(&self, conversation_id: i64, update: SettingUpdate) -> Result<()> {
        let value = match update {
            SettingUpdate::Enabled(enabled) => Bson::Boolean(enabled),
            SettingUpdate::IntervalMinutes(minutes) => Bson::Int64(minutes),
            SettingUpdate::SummaryTopic(topic_id) => Bson::Int64(topic_id),
            SettingUpdate::LastSummaryTime(at) => Bson::String(timestamp::format(&at)),
        };

        let mut fields = Document::new();
        fields.insert(update.field(), value);

        self.collection
            .update_one(doc! { "_id": conversation_id }, doc! { "$set": fields })
            .upsert(true)
            .await?;
        Ok(())
    }
}
