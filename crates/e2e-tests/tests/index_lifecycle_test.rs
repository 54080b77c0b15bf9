//! End-to-end index lifecycle tests: create, describe, delete.

use pretty_assertions::assert_eq;

use e2e_tests::fake_client;
use redisx_client::{ClientError, TransportError, VectorCommands};
use redisx_types::{DistanceMetric, ExtraArgs, IndexSpec, Quantization};

#[test]
fn test_create_get_delete_index() {
    let mut client = fake_client();

    let spec = IndexSpec::new("idx0", 3)
        .with_metric(DistanceMetric::Cosine)
        .with_efcon(64);
    assert!(client.create_index(&spec).unwrap());

    let info = client.get_index("idx0").unwrap().expect("index should exist");
    assert_eq!(info.get("name"), Some("idx0"));
    assert_eq!(info.get_usize("dimensions"), Some(3));
    assert_eq!(info.get("metric"), Some("COS"));
    assert_eq!(info.get("quantization"), Some("F32"));
    assert_eq!(info.get_usize("connectivity"), Some(10));
    assert_eq!(info.get_usize("expansion_add"), Some(64));
    assert_eq!(info.get_usize("index_size"), Some(0));

    assert!(client.del_index("idx0").unwrap());
    assert_eq!(client.get_index("idx0").unwrap(), None);
}

#[test]
fn test_missing_index_is_absent_not_error() {
    let mut client = fake_client();
    assert_eq!(client.get_index("nope").unwrap(), None);
}

#[test]
fn test_store_rejections_are_errors() {
    let mut client = fake_client();

    assert!(client.create_index(&IndexSpec::new("idx0", 3)).unwrap());
    let err = client.create_index(&IndexSpec::new("idx0", 3)).unwrap_err();
    assert!(
        matches!(&err, ClientError::Transport(TransportError::Server(m)) if m.contains("already exists")),
        "Second create of the same index should be a store error, got {:?}",
        err
    );

    assert!(client.del_index("idx0").unwrap());
    assert!(matches!(
        client.del_index("idx0"),
        Err(ClientError::Transport(TransportError::Server(_)))
    ));
}

#[test]
fn test_extra_options_reach_store_in_order() {
    let mut client = fake_client();
    let extra = ExtraArgs::new().with("zeta", 1).with("alpha", "two").with("mid", 3.5);
    assert!(client
        .create_index_with("idx0", 8, DistanceMetric::L2, extra)
        .unwrap());

    let index = client.transport().index("idx0").unwrap();
    assert_eq!(index.metric, DistanceMetric::L2);
    assert_eq!(
        index.extra,
        vec![
            ("zeta".to_string(), "1".to_string()),
            ("alpha".to_string(), "two".to_string()),
            ("mid".to_string(), "3.5".to_string()),
        ]
    );
}

#[test]
fn test_binary_index_describes_quantization() {
    let mut client = fake_client();
    let spec = IndexSpec::new("bits", 16)
        .with_metric(DistanceMetric::Hamming)
        .with_quantization(Quantization::B1);
    assert!(spec.is_binary());
    assert!(client.create_index(&spec).unwrap());

    let info = client.get_index("bits").unwrap().unwrap();
    assert_eq!(info.get("quantization"), Some("B1"));
    assert_eq!(info.get("metric"), Some("HAMMING"));
}

#[test]
fn test_index_info_serializes_as_flat_map() {
    let mut client = fake_client();
    client.create_index(&IndexSpec::new("idx0", 2)).unwrap();
    let info = client.get_index("idx0").unwrap().unwrap();

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["dimensions"], "2");
    assert_eq!(json["metric"], "IP");
}
