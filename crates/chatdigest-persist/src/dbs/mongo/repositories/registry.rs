use std::collections::BTreeSet;

use chrono::Utc;
use mongodb::{Client, Collection, bson::doc};
use futures::TryStreamExt;

use crate::dbs::mongo::models::{MongoConversation, MongoThreadRef};
use crate::error::Result;
use crate::models::{timestamp, ThreadKey};

/// Set-like collections: known conversations, known threads, selected threads
#[derive(Clone)]
pub struct MongoRegistryRepository {
    conversations: Collection<MongoConversation>,
    threads: Collection<MongoThreadRef>,
    selected: Collection<MongoThreadRef>,
}

impl MongoRegistryRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let database = client.database(db_name);
        Self {
            conversations: database.collection("chats"),
            threads: database.collection("threads"),
            selected: database.collection("selected_topics"),
        }
    }

    pub async fn add_conversation(&self, conversation_id: i64) -> Result<()> {
        self.conversations
            .update_one(
                doc! { "_id": conversation_id },
                doc! { "$setOnInsert": { "first_seen": timestamp::format(&Utc::now()) } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn conversations(&self) -> Result<BTreeSet<i64>> {
        let rows: Vec<MongoConversation> = self.conversations
            .find(doc! {})
            .await?
            .try_collect()
            .await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    pub async fn add_thread(&self, key: ThreadKey) -> Result<()> {
        Self::insert_ref(&self.threads, key.conversation_id, key.thread_id).await
    }

    pub async fn remove_thread(&self, key: ThreadKey) -> Result<()> {
        Self::delete_ref(&self.threads, key.conversation_id, key.thread_id).await
    }

    pub async fn threads(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        Self::list_refs(&self.threads, conversation_id).await
    }

    pub async fn add_selected(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        Self::insert_ref(&self.selected, conversation_id, thread_id).await
    }

    pub async fn remove_selected(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        Self::delete_ref(&self.selected, conversation_id, thread_id).await
    }

    pub async fn selected(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        Self::list_refs(&self.selected, conversation_id).await
    }

    async fn insert_ref(collection: &Collection<MongoThreadRef>, conversation_id: i64, thread_id: i64) -> Result<()> {
        let filter = doc! { "conversation_id": conversation_id, "thread_id": thread_id };
        collection
            .update_one(filter, doc! { "$setOnInsert": { "first_seen": timestamp::format(&Utc::now()) } })
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn delete_ref(collection: &Collection<MongoThreadRef>, conversation_id: i64, thread_id: i64) -> Result<()> {
        collection
            .delete_many(doc! { "conversation_id": conversation_id, "thread_id": thread_id })
            .await?;
        Ok(())
    }

    async fn list_refs(collection: &Collection<MongoThreadRef>, conversation_id: i64) -> Result<BTreeSet<i64>> {
        let rows: Vec<MongoThreadRef> = collection
            .find(doc! { "conversation_id": conversation_id })
            .await?
            .try_collect()
            .await?;
        Ok(rows.into_iter().map(|r| r.thread_id).collect())
    }
}
