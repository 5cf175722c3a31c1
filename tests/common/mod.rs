#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cycframe::{Database, Result};

/// A stand-in engine: answers each request with the JSON of the most recently
/// added route whose pattern occurs in the request text, `null` otherwise,
/// and records every request it sees.
#[derive(Clone, Default)]
pub struct Script {
    routes: Arc<Mutex<Vec<(String, String)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Script {
    pub fn new() -> Self {
        let script = Self::default();
        script.answer("(orgid-exist-p", "true");
        script
    }
    pub fn answer(&self, pattern: &str, json: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(0, (pattern.to_owned(), json.to_owned()));
        self
    }
    pub fn channel(&self) -> impl FnMut(&str) -> Result<String> + Send + 'static {
        let script = self.clone();
        move |request: &str| {
            script.requests.lock().unwrap().push(request.to_owned());
            let routes = script.routes.lock().unwrap();
            Ok(routes
                .iter()
                .find(|(pattern, _)| request.contains(pattern.as_str()))
                .map(|(_, json)| json.clone())
                .unwrap_or_else(|| "null".to_owned()))
        }
    }
    pub fn database(&self, org_id: &str) -> Database {
        Database::open(org_id, self.channel()).expect("organism known")
    }
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
    pub fn last(&self) -> String {
        self.requests().last().cloned().unwrap_or_default()
    }
    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
    pub fn count_matching(&self, pattern: &str) -> usize {
        self.requests().iter().filter(|r| r.contains(pattern)).count()
    }
}
