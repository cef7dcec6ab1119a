//! REST dispatch scenarios against an in-memory record set.

mod common;

use axum::http::{Method, StatusCode};
use resource_router::{Action, Api, ApiConfig, SharedSet};
use serde_json::{json, Value};

/// Run one request against a `/country` resource: a fresh dispatcher per
/// request, shared store behind.
fn dispatch(
    store: &SharedSet,
    method: Method,
    path: &str,
    body: Option<&Value>,
) -> Option<(StatusCode, Value)> {
    let mut api = Api::new(common::json_request(method, path, body));
    api.rest("/country", store.clone());
    api.into_response().map(|envelope| {
        let body = serde_json::from_str(&envelope.body).expect("valid JSON body");
        (envelope.status, body)
    })
}

#[test]
fn test_full_rest_lifecycle() {
    let store = SharedSet::new(common::country_set());
    let data = common::country_payload();

    // Create new record
    let (status, body) =
        dispatch(&store, Method::POST, "/country", Some(&data)).expect("response");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "name": "test",
            "sys_name": "test",
            "iso": "IT",
            "iso3": "ITA",
            "numcode": 666,
            "phonecode": 39,
        })
    );

    // Request one record by id
    let (status, body) =
        dispatch(&store, Method::GET, "/country/1", None).expect("response");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("test"));
    assert_eq!(body["numcode"], json!(666));

    // Request one record by value of some other field
    let (_, body) =
        dispatch(&store, Method::GET, "/country/name:test", None).expect("response");
    assert_eq!(body["id"], json!(1));

    // Request one record by bare value, resolved via the title field
    let (_, body) =
        dispatch(&store, Method::GET, "/country/:test", None).expect("response");
    assert_eq!(body["id"], json!(1));

    // Request all records
    let (_, body) = dispatch(&store, Method::GET, "/country", None).expect("response");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["iso3"], json!("ITA"));

    // Modify record data
    let mut update = data.clone();
    update["name"] = json!("test modified");
    let (status, body) =
        dispatch(&store, Method::POST, "/country/1", Some(&update)).expect("response");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("test modified"));
    assert_eq!(body["iso"], json!("IT"));

    // Delete record
    let (status, body) =
        dispatch(&store, Method::DELETE, "/country/1", None).expect("response");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    // Check via get-all
    let (_, body) = dispatch(&store, Method::GET, "/country", None).expect("response");
    assert_eq!(body, json!([]));
}

#[test]
fn test_put_and_patch_update_like_post() {
    let store = SharedSet::new(common::country_set());
    dispatch(&store, Method::POST, "/country", Some(&common::country_payload()))
        .expect("created");

    let (status, body) = dispatch(
        &store,
        Method::PUT,
        "/country/1",
        Some(&json!({"phonecode": 41})),
    )
    .expect("response");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phonecode"], json!(41));

    let (status, body) = dispatch(
        &store,
        Method::PATCH,
        "/country/1",
        Some(&json!({"phonecode": 43})),
    )
    .expect("response");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phonecode"], json!(43));
}

#[test]
fn test_read_restriction_limits_response_fields() {
    let store = SharedSet::new(
        common::country_set().allow(Action::Read, &["name", "iso", "numcode"]),
    );

    let (status, body) = dispatch(
        &store,
        Method::POST,
        "/country",
        Some(&common::country_payload()),
    )
    .expect("response");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "name": "test",
            "iso": "IT",
            "numcode": 666,
        })
    );

    let (_, body) = dispatch(&store, Method::GET, "/country/1", None).expect("response");
    assert_eq!(
        body.as_object().map(|m| m.len()),
        Some(3),
        "read scope must hide every other field"
    );
}

#[test]
fn test_validation_failure_yields_422_envelope() {
    let store = SharedSet::new(common::country_set());
    let (status, body) = dispatch(
        &store,
        Method::POST,
        "/country",
        Some(&json!({"iso": "IT"})),
    )
    .expect("response");
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!(422));
    assert_eq!(body["error"]["args"]["name"], json!("must not be empty"));
}

#[test]
fn test_missing_record_yields_404_envelope() {
    let store = SharedSet::new(common::country_set());
    let (status, body) =
        dispatch(&store, Method::GET, "/country/9", None).expect("response");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!(404));
    assert_eq!(body["error"]["args"]["value"], json!("9"));
}

#[test]
fn test_unmatched_path_produces_no_response() {
    let store = SharedSet::new(common::country_set());
    assert!(dispatch(&store, Method::GET, "/city/1", None).is_none());
}

#[test]
fn test_field_lookup_capability_can_be_disabled() {
    let store = SharedSet::new(common::country_set());
    dispatch(&store, Method::POST, "/country", Some(&common::country_payload()))
        .expect("created");

    let config = ApiConfig {
        field_lookup: false,
        ..ApiConfig::default()
    };
    let mut api = Api::with_config(
        common::json_request(Method::GET, "/country/name:test", None),
        config,
    );
    api.rest("/country", store.clone());

    // the whole segment is taken as a primary id, which does not exist
    let envelope = api.into_response().expect("response");
    assert_eq!(envelope.status, StatusCode::NOT_FOUND);
}
