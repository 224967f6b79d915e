#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rinth::{
    http::{HttpClient, Method, Request, Response},
    Modrinth, Result,
};
use serde_json::{json, Value};

/// Answers requests from a queue of canned responses keyed by method and
/// path, and records every request it sees.
#[derive(Default)]
pub struct FakeHttp {
    responses: Mutex<HashMap<(Method, String), VecDeque<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl FakeHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, response: Response) {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(response);
    }

    pub fn json(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, Response::new(200, body.to_string()));
    }

    pub fn status(&self, method: Method, path: &str, status: u16) {
        self.respond(method, path, Response::new(status, ""));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn client(self: &Arc<Self>, token: Option<&str>) -> Modrinth {
        Modrinth::with_http(self.clone(), token.map(ToOwned::to_owned))
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn request(&self, request: Request) -> Result<Response> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let response = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Response::new(404, format!("no canned response for {key:?}")));

        Ok(response)
    }
}

pub fn project(id: &str, team: &str) -> Value {
    json!({
        "id": id,
        "slug": format!("slug-{id}"),
        "title": format!("Project {id}"),
        "description": "A project",
        "body": "",
        "categories": ["utility"],
        "additional_categories": [],
        "client_side": "required",
        "server_side": "optional",
        "project_type": "mod",
        "status": "approved",
        "license": { "id": "MIT", "name": "MIT License", "url": null },
        "gallery": [],
        "team": team,
        "published": "2023-01-01T00:00:00Z",
        "updated": "2023-02-01T00:00:00Z",
        "downloads": 10,
        "followers": 1,
        "versions": []
    })
}

pub fn file(name: &str, url: &str, primary: bool, sha1: Option<&str>) -> Value {
    let hashes = match sha1 {
        Some(sha1) => json!({ "sha1": sha1 }),
        None => json!({}),
    };
    json!({
        "hashes": hashes,
        "url": url,
        "filename": name,
        "primary": primary,
        "size": 3,
        "file_type": null
    })
}

pub fn version(id: &str, project_id: &str, number: &str, version_type: &str) -> Value {
    json!({
        "name": format!("Version {number}"),
        "version_number": number,
        "changelog": null,
        "dependencies": [],
        "game_versions": ["1.20.1"],
        "version_type": version_type,
        "loaders": ["fabric"],
        "featured": false,
        "status": "listed",
        "id": id,
        "project_id": project_id,
        "author_id": "author",
        "date_published": "2023-01-01T00:00:00Z",
        "downloads": 0,
        "files": [file(
            &format!("{id}.jar"),
            &format!("https://cdn.modrinth.com/data/{project_id}/versions/{id}/{id}.jar"),
            true,
            None
        )]
    })
}

pub fn member(team_id: &str, username: &str) -> Value {
    json!({
        "team_id": team_id,
        "user": {
            "username": username,
            "id": format!("id-{username}"),
            "created": "2020-01-01T00:00:00Z",
            "role": "developer"
        },
        "role": "Member",
        "accepted": true
    })
}
