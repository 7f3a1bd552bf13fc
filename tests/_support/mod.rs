// Shared fixtures for integration tests.
#![allow(dead_code)]

use filelite::model::Model;
use filelite::types::Record;
use serde_json::Value;

pub fn rec(v: Value) -> Record {
    v.as_object().cloned().expect("fixture must be a JSON object")
}

pub struct User {
    attributes: Record,
}

impl Model for User {
    const COLLECTION: &'static str = "users";
    fn from_record(record: Record) -> Self {
        Self { attributes: record }
    }
    fn attributes(&self) -> &Record {
        &self.attributes
    }
    fn attributes_mut(&mut self) -> &mut Record {
        &mut self.attributes
    }
}

pub struct Post {
    attributes: Record,
}

impl Model for Post {
    const COLLECTION: &'static str = "posts";
    fn from_record(record: Record) -> Self {
        Self { attributes: record }
    }
    fn attributes(&self) -> &Record {
        &self.attributes
    }
    fn attributes_mut(&mut self) -> &mut Record {
        &mut self.attributes
    }
}

/// Model with no collection configured.
pub struct Orphan(Record);

impl Model for Orphan {
    const COLLECTION: &'static str = "";
    fn from_record(record: Record) -> Self {
        Self(record)
    }
    fn attributes(&self) -> &Record {
        &self.0
    }
    fn attributes_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}
