//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or error messages. Comparing parsed JSON (not
//! raw strings) avoids false negatives from field-ordering differences.

use todo_core::{CreateTodo, HttpMethod, HttpRequest, HttpResponse, Todo, TodoClient};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|h| {
                    let pair = h.as_array().unwrap();
                    (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: pairs(&sim["headers"]),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Check method, path, headers and JSON body of a built request.
fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");
    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

// ---------------------------------------------------------------------------
// List page
// ---------------------------------------------------------------------------

#[test]
fn list_page_test_vectors() {
    let raw = include_str!("../../test-vectors/list_page.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let page_param = case["input_page"].as_u64().unwrap() as u32;

        let req = c.build_list_page(page_param);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_list_page(page_param, simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), expected_error.as_str().unwrap(), "{name}: error");
        } else {
            let page = result.unwrap();
            let expected = &case["expected_result"];
            let items: Vec<Todo> = serde_json::from_value(expected["items"].clone()).unwrap();
            assert_eq!(page.items, items, "{name}: items");
            assert_eq!(
                page.next_cursor.map(u64::from),
                expected["next_cursor"].as_u64(),
                "{name}: next cursor"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: CreateTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_todo(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_todo(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_eq!(result.unwrap_err().to_string(), expected_error.as_str().unwrap(), "{name}: error");
        } else {
            let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[test]
fn toggle_test_vectors() {
    let raw = include_str!("../../test-vectors/toggle.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: Todo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_toggle_todo(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_toggle_todo(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_eq!(result.unwrap_err().to_string(), expected_error.as_str().unwrap(), "{name}: error");
        } else {
            let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap();

        let req = c.build_delete_todo(id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_todo(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_eq!(result.unwrap_err().to_string(), expected_error.as_str().unwrap(), "{name}: error");
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}
