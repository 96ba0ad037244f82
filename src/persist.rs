// used for persistence
use rusqlite::{Connection, Error, params};

use crate::error::Result;

// ------------- Persisted keys -------------
// The key layout is stable across process restarts for a given namespace.
// Names are the ones hosts may already have on disk from earlier releases.
pub const EVENTS_DISTINCT_ID: &str = "events_distinct_id";
pub const PEOPLE_DISTINCT_ID: &str = "people_distinct_id";
pub const SUPER_PROPERTIES: &str = "super_properties";
pub const WAITING_PEOPLE_RECORD: &str = "waiting_people_record";
pub const PUSH_ID: &str = "push_id";

/// Where the durable store lives.
#[derive(Debug, Clone)]
pub enum PersistenceMode {
    InMemory,
    File(String),
}

/// One staged change to a namespace. A batch of edits is applied atomically
/// by [`Persistor::commit`].
#[derive(Debug)]
pub enum Edit {
    Put(&'static str, String),
    Remove(&'static str),
}

// ------------- Persistence -------------
/// Durable key-value store, one namespace per project token.
///
/// Backed by SQLite. Every engine write goes through here, either as a single
/// [`put`](Persistor::put) or as a multi-key [`commit`](Persistor::commit)
/// inside one transaction, which is what keeps in-memory and persisted state
/// from diverging mid-operation.
pub struct Persistor {
    db: Connection,
}

impl Persistor {
    pub fn new(mode: &PersistenceMode) -> Result<Persistor> {
        let connection = match mode {
            PersistenceMode::InMemory => Connection::open_in_memory()?,
            PersistenceMode::File(path) => Connection::open(path)?,
        };
        connection.execute_batch(
            "
            create table if not exists Property (
                Namespace text not null,
                Property text not null,
                Value text not null,
                constraint unique_Property_per_Namespace primary key (
                    Namespace,
                    Property
                )
            );
            ",
        )?;
        Ok(Persistor { db: connection })
    }

    pub fn get(&self, namespace: &str, property: &str) -> Result<Option<String>> {
        let mut get_property = self.db.prepare_cached(
            "
            select Value
                from Property
                where Namespace = ?
                and Property = ?
            ",
        )?;
        match get_property.query_row(params![namespace, property], |row| row.get(0)) {
            Ok(value) => Ok(Some(value)),
            Err(Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn put(&self, namespace: &str, property: &str, value: &str) -> Result<()> {
        let mut put_property = self.db.prepare_cached(
            "
            insert or replace into Property (
                Namespace,
                Property,
                Value
            ) values (?, ?, ?)
            ",
        )?;
        put_property.execute(params![namespace, property, value])?;
        Ok(())
    }

    pub fn remove(&self, namespace: &str, property: &str) -> Result<()> {
        let mut remove_property = self.db.prepare_cached(
            "
            delete from Property
                where Namespace = ?
                and Property = ?
            ",
        )?;
        remove_property.execute(params![namespace, property])?;
        Ok(())
    }

    /// Applies every edit inside one transaction. Either the whole batch is
    /// durable or none of it is.
    pub fn commit(&mut self, namespace: &str, edits: &[Edit]) -> Result<()> {
        let tx = self.db.transaction()?;
        {
            let mut put_property = tx.prepare_cached(
                "
                insert or replace into Property (
                    Namespace,
                    Property,
                    Value
                ) values (?, ?, ?)
                ",
            )?;
            let mut remove_property = tx.prepare_cached(
                "
                delete from Property
                    where Namespace = ?
                    and Property = ?
                ",
            )?;
            for edit in edits {
                match edit {
                    Edit::Put(property, value) => {
                        put_property.execute(params![namespace, property, value])?;
                    }
                    Edit::Remove(property) => {
                        remove_property.execute(params![namespace, property])?;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Removes every key in the namespace.
    pub fn wipe(&self, namespace: &str) -> Result<()> {
        let mut wipe_namespace = self.db.prepare_cached(
            "
            delete from Property
                where Namespace = ?
            ",
        )?;
        wipe_namespace.execute(params![namespace])?;
        Ok(())
    }
}
