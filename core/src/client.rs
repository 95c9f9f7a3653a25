//! Stateless HTTP request builder and response parser for the record API.
//!
//! # Design
//! `RecordClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The methods are generic over `Record`, so vehicles and
//! clients share one code path and differ only in `Record::RESOURCE`.

use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Field, Record, RecordId};

#[derive(Debug, Clone)]
pub struct RecordClient {
    base_url: String,
}

impl RecordClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<R: Record>(&self) -> String {
        format!("{}/{}", self.base_url, R::RESOURCE.path())
    }

    fn item_url<R: Record>(&self, id: RecordId) -> String {
        format!("{}/{}/{id}", self.base_url, R::RESOURCE.path())
    }

    /// List the collection, optionally ordered by the given fields.
    pub fn build_list<R: Record>(&self, order_by: &[R::Field]) -> HttpRequest {
        let mut path = self.collection_url::<R>();
        if !order_by.is_empty() {
            let by: Vec<&str> = order_by.iter().map(|f| f.wire_name()).collect();
            path.push_str("?by=");
            path.push_str(&by.join(","));
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get<R: Record>(&self, id: RecordId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url::<R>(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST the draft. The identifier is left out of the body.
    pub fn build_create<R: Record>(&self, draft: &R) -> Result<HttpRequest, ApiError> {
        let mut body = serde_json::to_value(draft).map_err(|e| ApiError::Serialization(e.to_string()))?;
        if let Some(object) = body.as_object_mut() {
            object.remove("id");
        }
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url::<R>(),
            headers: json_headers(),
            body: Some(body.to_string()),
        })
    }

    pub fn build_update<R: Record>(&self, id: RecordId, draft: &R) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(draft).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.item_url::<R>(id),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete<R: Record>(&self, id: RecordId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url::<R>(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Rows that fail to decode are skipped so one bad record does not
    /// hide the rest of the collection.
    pub fn parse_list<R: Record>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        check_status(&response)?;
        let raw: Vec<serde_json::Value> = decode(&response.body)?;
        let rows = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(resource = %R::RESOURCE, index, error = %e, "skipping undecodable row");
                    None
                }
            })
            .collect();
        Ok(rows)
    }

    pub fn parse_get<R: Record>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create<R: Record>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_update<R: Record>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
///
/// Any 2xx is accepted: the deployed API answers creates with either 200 or
/// 201 depending on the resource.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Client, ClientField, Vehicle, VehicleField};

    fn client() -> RecordClient {
        RecordClient::new("http://localhost:3000")
    }

    fn fusca() -> Vehicle {
        Vehicle {
            brand: "Volkswagen".to_string(),
            model: "Fusca".to_string(),
            color: "Azul".to_string(),
            manufacture_year: 1978,
            plate: "ABC-1D23".to_string(),
            price: "15000".to_string(),
            ..Vehicle::default()
        }
    }

    #[test]
    fn build_list_without_ordering() {
        let req = client().build_list::<Client>(&[]);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/clientes");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_with_ordering() {
        let req = client().build_list::<Vehicle>(&[VehicleField::Brand, VehicleField::Model]);
        assert_eq!(req.path, "http://localhost:3000/karangos?by=marca,modelo");

        let req = client().build_list::<Client>(&[ClientField::Name]);
        assert_eq!(req.path, "http://localhost:3000/clientes?by=nome");
    }

    #[test]
    fn build_get_uses_item_path() {
        let req = client().build_get::<Vehicle>(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/karangos/42");
    }

    #[test]
    fn build_create_omits_identifier() {
        let mut draft = fusca();
        draft.id = Some(99);
        let req = client().build_create(&draft).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/karangos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["marca"], "Volkswagen");
        assert_eq!(body["importado"], "0");
        assert_eq!(body["preco"], 15000);
    }

    #[test]
    fn build_update_sends_full_record() {
        let mut draft = fusca();
        draft.id = Some(3);
        let req = client().build_update(3, &draft).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/karangos/3");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], 3);
        assert_eq!(body["placa"], "ABC-1D23");
    }

    #[test]
    fn build_delete_has_no_body() {
        let req = client().build_delete::<Client>(5);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/clientes/5");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":1,"marca":"Fiat","modelo":"Uno","cor":"Branco","ano_fabricacao":1990,
                "importado":"0","placa":"ABC-1234","preco":5000}]"#,
        );
        let rows = client().parse_list::<Vehicle>(response).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, Some(1));
        assert_eq!(rows[0].model, "Uno");
    }

    #[test]
    fn parse_list_skips_undecodable_rows() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":1,"marca":"Fiat","modelo":"Uno","cor":"Branco","ano_fabricacao":1990,
                "importado":"2","placa":"ABC-1234","preco":5000},
               {"id":2,"marca":"VW","modelo":"Gol","cor":"Azul","ano_fabricacao":1995,
                "importado":"0","placa":null,"preco":7000},
               {"id":3,"marca":"VW","modelo":"Fusca","cor":"Azul","ano_fabricacao":1978,
                "importado":"1","placa":"ABC-1D23","preco":15000}]"#,
        );
        let rows = client().parse_list::<Vehicle>(response).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(3)]);
    }

    #[test]
    fn parse_list_rejects_non_array_body() {
        let err = client()
            .parse_list::<Vehicle>(HttpResponse::new(200, r#"{"id":1}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_get_not_found() {
        let err = client().parse_get::<Vehicle>(HttpResponse::new(404, "")).unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }

    #[test]
    fn parse_create_accepts_200_and_201() {
        let body = r#"{"id":8,"marca":"Fiat","modelo":"Uno","cor":"Branco","ano_fabricacao":1990,
            "importado":"1","placa":"ABC-1234","preco":"5000.00"}"#;
        for status in [200, 201] {
            let created = client().parse_create::<Vehicle>(HttpResponse::new(status, body)).unwrap();
            assert_eq!(created.id, Some(8));
        }
    }

    #[test]
    fn parse_update_server_error() {
        let err = client()
            .parse_update::<Client>(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_delete_statuses() {
        assert!(client().parse_delete(HttpResponse::new(204, "")).is_ok());
        assert_eq!(
            client().parse_delete(HttpResponse::new(404, "")).unwrap_err(),
            ApiError::NotFound
        );
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list::<Client>(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = RecordClient::new("http://localhost:3000/");
        let req = client.build_list::<Vehicle>(&[]);
        assert_eq!(req.path, "http://localhost:3000/karangos");
    }
}
