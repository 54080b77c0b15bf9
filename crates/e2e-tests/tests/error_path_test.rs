//! Error path tests: every failure surfaces as a typed error, never a panic.
//!
//! Status operations turn a failed status into `false`; store error replies,
//! transport failures and undecodable replies always propagate.

use pretty_assertions::assert_eq;

use redisx_client::{Client, ClientError, MockTransport, TransportError, VectorCommands};
use redisx_codec::{CodecError, Reply};
use redisx_types::{ExtraArgs, IndexSpec};

#[test]
fn test_transport_failure_propagates_from_status_operation() {
    let mut client = Client::new(MockTransport::new());
    let err = client.create_index(&IndexSpec::new("idx0", 3)).unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Closed(_))));
}

#[test]
fn test_malformed_vector_in_reply() {
    let reply = Reply::from(vec!["name", "n1", "data", "1.0,2.0"]);
    let mut client = Client::new(MockTransport::new().with_reply(reply));
    let err = client.get_node("idx0", "n1").unwrap_err();
    assert!(matches!(err, ClientError::Codec(CodecError::MalformedVector(_))));
}

#[test]
fn test_invalid_component_in_reply() {
    let reply = Reply::Array(vec![
        Reply::from("name"),
        Reply::from("n1"),
        Reply::from("data"),
        Reply::from(vec!["1.0", "abc"]),
    ]);
    let mut client = Client::new(MockTransport::new().with_reply(reply));
    let err = client.get_node("idx0", "n1").unwrap_err();
    assert!(matches!(err, ClientError::Codec(CodecError::InvalidComponent(_))));
}

#[test]
fn test_search_row_not_a_field_map() {
    let reply = Reply::from(vec!["1", "0.5"]);
    let mut client = Client::new(MockTransport::new().with_reply(reply));
    let err = client
        .search_kann("idx0", 1, &[1.0f32], false, &ExtraArgs::new())
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Codec(CodecError::UnexpectedReply { .. })
    ));
}

#[test]
fn test_store_error_for_get_index() {
    let mut client =
        Client::new(MockTransport::new().with_reply(Reply::Error("ERR wrong type".into())));
    let err = client.get_index("idx0").unwrap_err();
    assert_eq!(err.to_string(), "Transport error: Store error: ERR wrong type");
}

#[test]
fn test_nested_error_reply_is_codec_error() {
    let reply = Reply::Array(vec![Reply::Int(1), Reply::Error("ERR row failed".into())]);
    let mut client = Client::new(MockTransport::new().with_reply(reply));
    let err = client
        .search_kann("idx0", 1, &[1.0f32], false, &ExtraArgs::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Codec error: Error reply for USEARCH.SEARCH.KANN: ERR row failed"
    );
}

#[test]
fn test_invalid_input_is_rejected_before_sending() {
    let mut client = Client::new(MockTransport::new());
    let empty: [f32; 0] = [];

    assert!(client.create_index(&IndexSpec::new("idx0", 0)).is_err());
    assert!(client.create_index(&IndexSpec::new("", 3)).is_err());
    assert!(client.get_index("").is_err());
    assert!(client.add_node("idx0", "", &[1.0f32], false, &ExtraArgs::new()).is_err());
    assert!(client.add_node("idx0", "n", &empty, false, &ExtraArgs::new()).is_err());
    assert!(client.search_kann("idx0", 0, &[1.0f32], false, &ExtraArgs::new()).is_err());
    assert!(client
        .search_kann("idx0", 1, &[f32::NAN], false, &ExtraArgs::new())
        .is_err());

    assert!(client.transport().sent().is_empty());
}
