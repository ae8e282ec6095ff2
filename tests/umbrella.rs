use lnd_rest::records::{LndResponse, NodeInfo};
use lnd_rest::{lnd_rest_meta, Operation, PrivilegeTier};

#[test]
fn test_reexports() {
    assert_eq!(lnd_rest_meta::VERSION, env!("CARGO_PKG_VERSION"));
    assert_eq!(Operation::GetGraphNode.tier(), PrivilegeTier::Readonly);

    let body = serde_json::json!({"node": {"alias": "carol"}});
    match LndResponse::<NodeInfo>::from_value(body).expect("decodes") {
        LndResponse::Success(info) => assert_eq!(info.node.alias, "carol"),
        LndResponse::Error(e) => panic!("unexpected error: {}", e),
    }
}
