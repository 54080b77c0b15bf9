//! End-to-end node insertion, lookup, deletion and k-NN search tests.

use pretty_assertions::assert_eq;

use e2e_tests::{as_f64, fake_client, random_vectors};
use redisx_client::{ClientError, TransportError, VectorCommands};
use redisx_codec::CodecError;
use redisx_types::{DistanceMetric, ExtraArgs, IndexSpec, NodeMatch, Quantization, Vector};

fn no_extra() -> ExtraArgs {
    ExtraArgs::new()
}

#[test]
fn test_add_and_get_named_node() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 3)).unwrap();

    assert!(client
        .add_node("idx0", "n1", &[0.25f32, 0.5, 0.75], false, &no_extra())
        .unwrap());

    let nodes = client.get_node("idx0", "n1").unwrap();
    assert_eq!(
        nodes,
        vec![NodeMatch::new("1")
            .with_name("usearch.idx0.n1")
            .with_vector(Vector::Float(vec![0.25, 0.5, 0.75]))]
    );
    assert_eq!(nodes[0].numeric_id(), Some(1));
}

#[test]
fn test_add_and_get_node_by_id() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 2)).unwrap();

    assert!(client
        .add_node_by_id("idx0", 42, &[1.5f64, -2.0], false, &no_extra())
        .unwrap());
    assert!(
        matches!(
            client.add_node_by_id("idx0", 42, &[0.0f64, 0.0], false, &no_extra()),
            Err(ClientError::Transport(TransportError::Server(_)))
        ),
        "Duplicate id should be a store error"
    );

    let nodes = client.get_node_by_id("idx0", 42).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, "42");
    assert_eq!(as_f64(nodes[0].vector.as_ref().unwrap()), vec![1.5, -2.0]);
}

#[test]
fn test_integral_components_come_back_as_integers() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 3)).unwrap();
    client.add_node("idx0", "n1", &[1.0f32, 1.0, 1.0], false, &no_extra()).unwrap();

    let nodes = client.get_node("idx0", "n1").unwrap();
    assert_eq!(nodes[0].vector, Some(Vector::Int(vec![1, 1, 1])));
}

#[test]
fn test_missing_node_is_store_error() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 2)).unwrap();
    for result in [client.get_node("idx0", "ghost"), client.get_node_by_id("idx0", 9)] {
        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::Server(m))) if m.contains("not found")
        ));
    }
}

#[test]
fn test_dimension_mismatch_is_store_error() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 3)).unwrap();
    let err = client
        .add_node("idx0", "short", &[1.0f32, 2.0], false, &no_extra())
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Server(_))));
    assert_eq!(client.transport().index("idx0").unwrap().nodes.len(), 0);
}

#[test]
fn test_delete_nodes() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 2)).unwrap();
    client.add_node("idx0", "a", &[1.0f32, 0.0], false, &no_extra()).unwrap();
    client.add_node_by_id("idx0", 7, &[0.0f32, 1.0], false, &no_extra()).unwrap();

    assert!(client.del_node("idx0", "a").unwrap());
    assert!(!client.del_node("idx0", "a").unwrap());
    assert!(client.del_node_by_id("idx0", 7).unwrap());
    assert!(!client.del_node_by_id("idx0", 7).unwrap());

    let info = client.get_index("idx0").unwrap().unwrap();
    assert_eq!(info.get_usize("index_size"), Some(0));
}

#[test]
fn test_search_returns_nearest_first() {
    let mut client = fake_client();
    client
        .create_index(&IndexSpec::new("l2", 2).with_metric(DistanceMetric::L2))
        .unwrap();
    let points = [("far", [10.0f32, 10.0]), ("near", [1.0, 1.0]), ("mid", [3.0, 4.0])];
    for (name, point) in &points {
        client.add_node("l2", name, point, false, &no_extra()).unwrap();
    }

    let hits = client
        .search_kann("l2", 2, &[0.0f32, 0.0], false, &no_extra())
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "2");
    assert_eq!(hits[1].id, "3");
    assert!((hits[1].distance.unwrap() - 5.0).abs() < 1e-6);
    assert_eq!(hits[0].name.as_deref(), Some("usearch.l2.near"));
    assert_eq!(hits[0].vector, None);
}

#[test]
fn test_search_k_larger_than_index() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 4)).unwrap();
    for (i, v) in random_vectors(7, 5, 4).iter().enumerate() {
        client
            .add_node_by_id("idx0", i as u64 + 1, v, false, &no_extra())
            .unwrap();
    }

    let hits = client
        .search_kann("idx0", 50, &[0.1f32, 0.2, 0.3, 0.4], false, &no_extra())
        .unwrap();
    assert_eq!(hits.len(), 5);
    let distances: Vec<f64> = hits.iter().map(|h| h.distance.unwrap()).collect();
    let mut sorted = distances.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(distances, sorted);
}

#[test]
fn test_binary_index_round_trip() {
    let mut client = fake_client();
    let spec = IndexSpec::new("bits", 4)
        .with_metric(DistanceMetric::Hamming)
        .with_quantization(Quantization::B1);
    client.create_index(&spec).unwrap();

    let binary = spec.is_binary();
    client.add_node_by_id("bits", 1, &[1u8, 0, 1, 1], binary, &no_extra()).unwrap();
    client.add_node_by_id("bits", 2, &[0u8, 0, 0, 0], binary, &no_extra()).unwrap();

    let nodes = client.get_node_by_id("bits", 1).unwrap();
    assert_eq!(nodes[0].vector, Some(Vector::Int(vec![1, 0, 1, 1])));

    let hits = client
        .search_kann("bits", 1, &[true, false, true, false], binary, &no_extra())
        .unwrap();
    assert_eq!(hits[0].id, "1");
    assert_eq!(hits[0].distance, Some(1.0));
}

#[test]
fn test_binary_encoding_rejects_non_bits_before_sending() {
    let mut client = fake_client();
    let err = client
        .add_node_by_id("bits", 1, &[2u8, 0], true, &no_extra())
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Codec(CodecError::UnsupportedComponentValue { index: 0, .. })
    ));
    assert_eq!(client.transport().commands_seen(), 0);
}

#[test]
fn test_search_empty_index() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 2)).unwrap();
    let hits = client
        .search_kann("idx0", 10, &[1.0f32, 1.0], false, &no_extra())
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_search_missing_index_is_store_error() {
    let mut client = fake_client();
    let err = client
        .search_kann("nope", 3, &[1.0f32], false, &no_extra())
        .unwrap_err();
    match err {
        ClientError::Transport(TransportError::Server(message)) => {
            assert!(message.contains("not found"), "got: {}", message);
        }
        other => panic!("Expected store error, got {:?}", other),
    }
}
