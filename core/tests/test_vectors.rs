//! Verify the endpoint table, request merging and response classification
//! against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names an endpoint call, the cookie string visible at call
//! time, the expected merged request, a simulated response and the expected
//! outcome. Comparing parsed JSON (not raw strings) avoids false negatives
//! from field-ordering differences.

use serde_json::Value;
use webtoon_client::{
    build_request, endpoints, parse_response, ApiError, ClientConfig, CookieString, Endpoint,
    HttpMethod, HttpResponse,
};

const BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

/// Map a vector's `call`/`args` onto the endpoint table.
fn endpoint_for(call: &str, args: &Value) -> Endpoint {
    let id = || args.as_u64().expect("numeric id");
    match call {
        "signup" => endpoints::signup(args).unwrap(),
        "login" => endpoints::login(args).unwrap(),
        "logout" => endpoints::logout(),
        "me" => endpoints::me(),
        "webtoons" => endpoints::webtoons(args).unwrap(),
        "webtoon" => endpoints::webtoon(id()),
        "toggle_favorite" => endpoints::toggle_favorite(id()),
        "my_favorites" => endpoints::my_favorites(args).unwrap(),
        "recommend_by_favorites" => endpoints::recommend_by_favorites(),
        "recommend_by_synopsis" => endpoints::recommend_by_synopsis(id()),
        other => panic!("unknown call: {other}"),
    }
}

#[test]
fn endpoint_test_vectors() {
    let raw = include_str!("../../test-vectors/endpoints.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let config = ClientConfig::new(BASE_URL);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let endpoint = endpoint_for(case["call"].as_str().unwrap(), &case["args"]);
        let cookies = CookieString::new(case["cookies"].as_str().unwrap());
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build_request(&config, &cookies, &endpoint.path, endpoint.options).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body = match req.body.as_deref() {
            Some(body) => serde_json::from_str(body).unwrap(),
            None => Value::Null,
        };
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let outcome = parse_response(&response);
        let expected = &case["expected"];

        if let Some(data) = expected.get("ok") {
            assert_eq!(&outcome.unwrap(), data, "{name}: parsed result");
        } else if let Some(error) = expected.get("error") {
            match outcome.unwrap_err() {
                ApiError::Http { status, data } => {
                    assert_eq!(Some(u64::from(status)), error["status"].as_u64(), "{name}: status");
                    assert_eq!(data, error["data"], "{name}: error data");
                }
                other => panic!("{name}: unexpected error {other}"),
            }
        } else {
            assert!(matches!(outcome, Err(ApiError::Parse(_))), "{name}: expected parse failure");
        }
    }
}
