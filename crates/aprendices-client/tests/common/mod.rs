#![allow(dead_code)]

use std::sync::Arc;

use aprendices_client::{ClientConfig, DashboardQueryClient, RequestGateway};
use aprendices_session::{MemorySessionStore, RecordingObserver, SessionPolicy};

/// A client wired to in-memory session state and a recording observer.
pub struct Harness {
    pub client: DashboardQueryClient,
    pub store: Arc<MemorySessionStore>,
    pub observer: Arc<RecordingObserver>,
}

impl Harness {
    pub fn gateway(&self) -> &RequestGateway {
        self.client.gateway()
    }
}

pub fn harness(config: ClientConfig) -> Harness {
    let store = Arc::new(MemorySessionStore::new());
    let observer = Arc::new(RecordingObserver::default());
    let session = SessionPolicy::new(store.clone(), observer.clone());
    let client = DashboardQueryClient::new(config, session).unwrap();
    Harness {
        client,
        store,
        observer,
    }
}

pub fn dashboard_body() -> serde_json::Value {
    serde_json::json!({
        "cards": {
            "total_aprendices": 30,
            "activos": 25,
            "femeninos": 14,
            "masculinos": 15,
            "no_binarios": 1,
            "total_grupos": 3,
            "grupos_virtuales": 1,
            "grupos_presenciales": 2
        },
        "charts": {
            "distribucion_nivel": [{ "NIVEL_FORMACION": "TECNOLOGO", "cantidad": 3 }],
            "distribucion_modalidad": [
                { "MODALIDAD_FORMACION": "PRESENCIAL", "cantidad": 2 },
                { "MODALIDAD_FORMACION": "VIRTUAL", "cantidad": 1 }
            ],
            "distribucion_programas": [
                { "NOMBRE_PROGRAMA_FORMACION": "ANALISIS Y DESARROLLO DE SOFTWARE", "cantidad": 3 }
            ]
        }
    })
}
