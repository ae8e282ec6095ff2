//! LND REST Client
//!
//! This module provides the request-dispatching client. Every call builds one
//! HTTP request from the [`Operation`] table, attaches the macaroon for the
//! operation's tier, awaits the reply and shapes it.

use std::collections::HashMap;
use std::sync::Arc;

use http::{HttpTransport, TlsOptions};
use serde::de::DeserializeOwned;
use serde_json::Value;
use transport::{DynTransport, HttpMethod, RestRequest};
use types::{
    BlockchainBalance, ChannelBalance, ChannelTransactionRequest, LndResponse, Macaroons,
    NodeInfo, OnChainTransaction, OnChainTransactionRequest, PayReq, Payment, SendPaymentRequest,
    SendResponse,
};

use crate::error::ClientError;
use crate::operation::Operation;
use crate::runtime::Runtime;
use crate::shape::{self, ResponseShape};

/// Per-operation response shaping for [`LndRestClient::execute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    shapes: HashMap<Operation, ResponseShape>,
}

impl ClientConfig {
    /// Override the shape of one operation.
    pub fn with_shape(mut self, operation: Operation, shape: ResponseShape) -> Self {
        self.shapes.insert(operation, shape);
        self
    }

    /// Use `shape` for every operation.
    pub fn with_all_shapes(mut self, shape: ResponseShape) -> Self {
        for op in Operation::ALL {
            self.shapes.insert(op, shape);
        }
        self
    }

    /// The shape in effect for `operation`.
    pub fn shape_for(&self, operation: Operation) -> ResponseShape {
        self.shapes.get(&operation).copied().unwrap_or_else(|| operation.default_shape())
    }
}

/// LND REST client
///
/// Immutable after construction and cheap to clone; clones share the
/// transport. Calls may run concurrently.
#[derive(Clone)]
pub struct LndRestClient {
    transport: DynTransport,
    macaroons: Macaroons,
    config: ClientConfig,
}

impl std::fmt::Debug for LndRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LndRestClient")
            .field("base_url", &self.transport.endpoint())
            .field("macaroons", &self.macaroons)
            .field("config", &self.config)
            .finish()
    }
}

impl LndRestClient {
    /// Create a client for `base_url` using the platform's trust roots.
    ///
    /// # Errors
    /// [`ClientError::BrowserEnvironment`] when running in a browser.
    pub fn new(base_url: impl Into<String>, macaroons: Macaroons) -> Result<Self, ClientError> {
        Self::with_tls(base_url, macaroons, TlsOptions::default())
    }

    /// Create a client with custom TLS settings (e.g. LND's `tls.cert`).
    pub fn with_tls(
        base_url: impl Into<String>,
        macaroons: Macaroons,
        tls: TlsOptions,
    ) -> Result<Self, ClientError> {
        Runtime::current().ensure_server_side()?;
        let transport = HttpTransport::with_tls(base_url, tls)?;
        Self::build(Arc::new(transport), macaroons, ClientConfig::default(), Runtime::current())
    }

    /// Create a client over any transport.
    pub fn with_transport(
        transport: DynTransport,
        macaroons: Macaroons,
    ) -> Result<Self, ClientError> {
        Self::build(transport, macaroons, ClientConfig::default(), Runtime::current())
    }

    /// Create a client from a loaded configuration file.
    pub fn from_config(config: &config::Config) -> Result<Self, ClientError> {
        let tls = TlsOptions {
            cert_path: config.node.tls_cert_path.clone(),
            accept_invalid_certs: config.node.accept_invalid_certs,
        };
        Self::with_tls(config.node.base_url.clone(), config.macaroons()?, tls)
    }

    fn build(
        transport: DynTransport,
        macaroons: Macaroons,
        config: ClientConfig,
        runtime: Runtime,
    ) -> Result<Self, ClientError> {
        runtime.ensure_server_side()?;
        logging::trace("CLIENT", &format!("→ LND REST client for {}", transport.endpoint()));
        Ok(Self { transport, macaroons, config })
    }

    /// Replace the shaping configuration used by [`execute`](Self::execute).
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str { self.transport.endpoint() }

    /// Shaping configuration in effect.
    pub fn config(&self) -> &ClientConfig { &self.config }

    /// Send one request for `operation` and return the decoded body.
    async fn dispatch(
        &self,
        operation: Operation,
        path_args: &[&str],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let path = operation.path(path_args)?;
        let tier = operation.tier();
        let macaroon = self.macaroons.for_tier(tier).to_string();

        if operation.moves_funds() {
            tracing::info!(operation = %operation, "submitting fund-moving request");
        }
        tracing::debug!(
            operation = %operation,
            method = %operation.method(),
            path = %path,
            tier = %tier,
            "dispatching"
        );

        let request = match (operation.method(), operation.prepare_body(body)) {
            (HttpMethod::Post, body) => {
                let body = body.unwrap_or_else(|| Value::Object(Default::default()));
                RestRequest::post(path, macaroon, body)
            }
            (HttpMethod::Get, _) => RestRequest::get(path, macaroon),
        };

        self.transport.send(request).await.map_err(|e| {
            tracing::error!(operation = %operation, "request failed: {}", e);
            ClientError::from(e)
        })
    }

    /// Call any operation and shape the body per the configured
    /// [`ResponseShape`].
    ///
    /// Unlike the typed methods, every field LND sends is kept.
    ///
    /// Under [`ResponseShape::Normalized`] the returned object carries a
    /// `_type` field; under [`ResponseShape::PassThrough`] it is the body as
    /// LND sent it (minus the `result` envelope for payment sending).
    pub async fn execute(
        &self,
        operation: Operation,
        path_args: &[&str],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let raw = self.dispatch(operation, path_args, body).await?;
        shape::apply(operation, self.config.shape_for(operation), raw)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        path_args: &[&str],
        body: Option<Value>,
    ) -> Result<LndResponse<T>, ClientError> {
        let raw = self.dispatch(operation, path_args, body).await?;
        let payload = shape::unwrap_result(operation, raw)?;
        Ok(LndResponse::from_value(payload)?)
    }

    // The typed methods below decode into fixed records; fields LND adds
    // beyond those records are dropped. `execute` returns the whole body.

    /// Pay a payment request over a channel (`POST /v1/channels/transactions`).
    ///
    /// Uses the admin macaroon. Check `payment_error` on success: LND reports
    /// routing failures there rather than as an error.
    pub async fn create_channels_transaction(
        &self,
        request: &ChannelTransactionRequest,
    ) -> Result<LndResponse<SendResponse>, ClientError> {
        let body = serde_json::to_value(request)?;
        self.call(Operation::CreateChannelsTransaction, &[], Some(body)).await
    }

    /// Send coins on chain (`POST /v1/transactions`). Uses the admin macaroon.
    pub async fn create_on_chain_transaction(
        &self,
        request: &OnChainTransactionRequest,
    ) -> Result<LndResponse<OnChainTransaction>, ClientError> {
        let body = serde_json::to_value(request)?;
        self.call(Operation::CreateOnChainTransaction, &[], Some(body)).await
    }

    /// Wallet balance (`GET /v1/balance/blockchain`).
    ///
    /// Only the fields of [`BlockchainBalance`] are kept. Use
    /// [`execute`](Self::execute) with [`Operation::GetBlockchainBalance`]
    /// for the full body, e.g. `locked_balance`.
    pub async fn get_blockchain_balance(
        &self,
    ) -> Result<LndResponse<BlockchainBalance>, ClientError> {
        self.call(Operation::GetBlockchainBalance, &[], None).await
    }

    /// Channel balance (`GET /v1/balance/channels`).
    pub async fn get_channels_balance(&self) -> Result<LndResponse<ChannelBalance>, ClientError> {
        self.call(Operation::GetChannelsBalance, &[], None).await
    }

    /// Graph node info (`GET /v1/graph/node/{pub_key}`).
    pub async fn get_graph_node(&self, pub_key: &str) -> Result<LndResponse<NodeInfo>, ClientError> {
        self.call(Operation::GetGraphNode, &[pub_key], None).await
    }

    /// Decode a payment request (`GET /v1/payreq/{payment_request}`).
    pub async fn get_payment_request(
        &self,
        payment_request: &str,
    ) -> Result<LndResponse<PayReq>, ClientError> {
        self.call(Operation::GetPaymentRequest, &[payment_request], None).await
    }

    /// Pay through the router and wait for the final state
    /// (`POST /v2/router/send`). Uses the admin macaroon.
    ///
    /// The success payload is the `result` object of LND's reply.
    pub async fn send_payment_v2(
        &self,
        request: &SendPaymentRequest,
    ) -> Result<LndResponse<Payment>, ClientError> {
        let body = serde_json::to_value(request)?;
        self.call(Operation::SendPaymentV2, &[], Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use transport::{Transport, TransportError};
    use types::{LndError, PaymentStatus, PrivilegeTier};

    use super::*;

    /// Replies with one scripted body and records what it was sent.
    struct ScriptedTransport {
        reply: Value,
        seen: Mutex<Vec<RestRequest>>,
    }

    impl ScriptedTransport {
        fn new(reply: Value) -> Arc<Self> { Arc::new(Self { reply, seen: Mutex::new(Vec::new()) }) }

        fn only_request(&self) -> RestRequest {
            let seen = self.seen.lock().expect("lock");
            assert_eq!(seen.len(), 1, "exactly one request per call");
            seen[0].clone()
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: RestRequest) -> Result<Value, TransportError> {
            self.seen.lock().expect("lock").push(request);
            Ok(self.reply.clone())
        }

        fn endpoint(&self) -> &str { "https://lnd.example" }
    }

    struct FailingTransport;

    #[async_trait::async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _request: RestRequest) -> Result<Value, TransportError> {
            Err(TransportError::Http("connection refused".to_string()))
        }

        fn endpoint(&self) -> &str { "https://lnd.example" }
    }

    fn macaroons() -> Macaroons {
        Macaroons::new("adminMacaroon", "readonlyMacaroon", "invoiceMacaroon")
    }

    fn client(transport: Arc<ScriptedTransport>) -> LndRestClient {
        LndRestClient::with_transport(transport, macaroons()).expect("native runtime")
    }

    #[test]
    fn test_build_refuses_browser() {
        let transport = ScriptedTransport::new(json!({}));
        let result =
            LndRestClient::build(transport, macaroons(), ClientConfig::default(), Runtime::Browser);
        assert!(matches!(result, Err(ClientError::BrowserEnvironment)));
    }

    #[test]
    fn test_new_accepts_base_url() {
        let lnd = LndRestClient::new("https://lnd.example", macaroons()).expect("client builds");
        assert_eq!(lnd.base_url(), "https://lnd.example");
        assert!(!format!("{:?}", lnd).contains("adminMacaroon"));
    }

    #[tokio::test]
    async fn test_blockchain_balance_success() {
        let t = ScriptedTransport::new(json!({
            "total_balance": "100",
            "confirmed_balance": "90",
            "unconfirmed_balance": "10"
        }));
        let lnd = client(t.clone());

        let resp = lnd.get_blockchain_balance().await.expect("call succeeds");
        assert_eq!(
            serde_json::to_value(&resp).expect("serialize"),
            json!({
                "_type": "success",
                "total_balance": "100",
                "confirmed_balance": "90",
                "unconfirmed_balance": "10"
            })
        );

        let req = t.only_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/v1/balance/blockchain");
        assert_eq!(req.macaroon, "readonlyMacaroon");
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn test_payment_request_error() {
        let t = ScriptedTransport::new(json!({
            "error": "invalid request",
            "message": "bad payreq",
            "code": 3,
            "details": []
        }));
        let lnd = client(t.clone());

        let resp = lnd.get_payment_request("lnbcBAD").await.expect("remote errors are data");
        assert_eq!(
            resp,
            LndResponse::Error(LndError {
                error: "invalid request".to_string(),
                message: "bad payreq".to_string(),
                code: 3,
                details: vec![],
            })
        );
        assert_eq!(t.only_request().path, "/v1/payreq/lnbcBAD");
    }

    #[tokio::test]
    async fn test_credential_selection_is_fixed() {
        let lnd_for = |reply: Value| {
            let t = ScriptedTransport::new(reply);
            (client(t.clone()), t)
        };

        let (lnd, t) = lnd_for(json!({"balance": "1"}));
        lnd.get_channels_balance().await.expect("ok");
        assert_eq!(t.only_request().macaroon, "readonlyMacaroon");

        let (lnd, t) = lnd_for(json!({"node": {}}));
        lnd.get_graph_node("02abc").await.expect("ok");
        let req = t.only_request();
        assert_eq!(req.macaroon, "readonlyMacaroon");
        assert_eq!(req.path, "/v1/graph/node/02abc");

        let (lnd, t) = lnd_for(json!({"txid": "ff"}));
        lnd.create_on_chain_transaction(&OnChainTransactionRequest::new("bc1q", 1000u64))
            .await
            .expect("ok");
        let req = t.only_request();
        assert_eq!(req.macaroon, "adminMacaroon");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body, Some(json!({"addr": "bc1q", "amount": 1000})));

        let (lnd, t) = lnd_for(json!({"payment_error": ""}));
        lnd.create_channels_transaction(&ChannelTransactionRequest::new("lnbc1"))
            .await
            .expect("ok");
        let req = t.only_request();
        assert_eq!(req.macaroon, "adminMacaroon");
        assert_eq!(req.path, "/v1/channels/transactions");
        assert_eq!(req.body, Some(json!({"payment_request": "lnbc1"})));
    }

    #[tokio::test]
    async fn test_execute_uses_tier_of_every_operation() {
        for op in Operation::ALL {
            let t = ScriptedTransport::new(json!({"result": {}}));
            let lnd = client(t.clone()).with_config(
                ClientConfig::default().with_all_shapes(ResponseShape::PassThrough),
            );
            let args: Vec<&str> = (0..op.path_arity()).map(|_| "x").collect();
            lnd.execute(op, &args, Some(json!({}))).await.expect("ok");

            let expected = match op.tier() {
                PrivilegeTier::Admin => "adminMacaroon",
                PrivilegeTier::Readonly => "readonlyMacaroon",
                PrivilegeTier::Invoice => "invoiceMacaroon",
            };
            assert_eq!(t.only_request().macaroon, expected, "{}", op);
        }
    }

    #[tokio::test]
    async fn test_send_payment_v2_unwraps_result() {
        let t = ScriptedTransport::new(json!({
            "result": {
                "payment_hash": "h",
                "value_sat": "1000",
                "status": "SUCCEEDED",
                "failure_reason": "FAILURE_REASON_NONE"
            }
        }));
        let lnd = client(t.clone());

        let request = SendPaymentRequest {
            fee_limit_sat: Some(10),
            max_parts: 4,
            payment_request: "lnbc1".to_string(),
            timeout_seconds: 60,
        };
        let payment = lnd
            .send_payment_v2(&request)
            .await
            .expect("call succeeds")
            .into_result()
            .expect("success");
        assert_eq!(payment.payment_hash, "h");
        assert_eq!(payment.status, PaymentStatus::Succeeded);

        let req = t.only_request();
        assert_eq!(req.path, "/v2/router/send");
        assert_eq!(req.macaroon, "adminMacaroon");
        assert_eq!(
            req.body,
            Some(json!({
                "fee_limit_sat": 10,
                "max_parts": 4,
                "payment_request": "lnbc1",
                "timeout_seconds": 60,
                "no_inflight_updates": true
            }))
        );
    }

    #[tokio::test]
    async fn test_send_payment_v2_streamed_error() {
        let t = ScriptedTransport::new(json!({
            "error": {"code": 2, "message": "invoice is already paid", "details": []}
        }));
        let lnd = client(t);
        let request = SendPaymentRequest {
            fee_limit_sat: None,
            max_parts: 1,
            payment_request: "lnbc1".to_string(),
            timeout_seconds: 60,
        };
        let err = lnd
            .send_payment_v2(&request)
            .await
            .expect("remote errors are data")
            .into_result()
            .expect_err("error variant");
        assert_eq!(err.code, 2);
        assert_eq!(err.message, "invoice is already paid");
    }

    #[tokio::test]
    async fn test_execute_shapes() {
        let body = json!({"error": "unavailable", "message": "wallet locked", "code": 14, "details": []});

        let normalized = client(ScriptedTransport::new(body.clone()));
        let out = normalized.execute(Operation::GetBlockchainBalance, &[], None).await.expect("ok");
        assert_eq!(out["_type"], "error");
        assert_eq!(out["message"], "wallet locked");

        let raw = client(ScriptedTransport::new(body.clone())).with_config(
            ClientConfig::default()
                .with_shape(Operation::GetBlockchainBalance, ResponseShape::PassThrough),
        );
        assert_eq!(raw.config().shape_for(Operation::GetChannelsBalance), ResponseShape::Normalized);
        let out = raw.execute(Operation::GetBlockchainBalance, &[], None).await.expect("ok");
        assert_eq!(out, body);
    }

    #[tokio::test]
    async fn test_execute_send_payment_without_body_skips_inflight_updates() {
        let t = ScriptedTransport::new(json!({"result": {"status": "SUCCEEDED"}}));
        let lnd = client(t.clone());

        let out = lnd.execute(Operation::SendPaymentV2, &[], None).await.expect("ok");
        assert_eq!(out, json!({"_type": "success", "status": "SUCCEEDED"}));
        assert_eq!(t.only_request().body, Some(json!({"no_inflight_updates": true})));
    }

    #[tokio::test]
    async fn test_execute_and_typed_agree_on_streamed_error() {
        let body = json!({"error": {"code": 2, "message": "invoice is already paid", "details": []}});
        let request = SendPaymentRequest {
            fee_limit_sat: None,
            max_parts: 1,
            payment_request: "lnbc1".to_string(),
            timeout_seconds: 60,
        };

        let typed = client(ScriptedTransport::new(body.clone()))
            .send_payment_v2(&request)
            .await
            .expect("remote errors are data");
        let shaped = client(ScriptedTransport::new(body))
            .execute(Operation::SendPaymentV2, &[], Some(json!({"payment_request": "lnbc1"})))
            .await
            .expect("remote errors are data");

        assert_eq!(serde_json::to_value(&typed).expect("serialize"), shaped);
        assert_eq!(shaped["error"], "invoice is already paid");
    }

    #[tokio::test]
    async fn test_execute_keeps_fields_typed_methods_drop() {
        let body = json!({
            "total_balance": "100",
            "confirmed_balance": "90",
            "unconfirmed_balance": "10",
            "locked_balance": "5"
        });

        let typed = client(ScriptedTransport::new(body.clone()))
            .get_blockchain_balance()
            .await
            .expect("ok");
        let typed = serde_json::to_value(&typed).expect("serialize");
        assert!(typed.get("locked_balance").is_none());

        let full = client(ScriptedTransport::new(body))
            .execute(Operation::GetBlockchainBalance, &[], None)
            .await
            .expect("ok");
        assert_eq!(full["locked_balance"], "5");
        assert_eq!(full["_type"], "success");
    }

    #[tokio::test]
    async fn test_transport_fault_is_raised() {
        let lnd = LndRestClient::with_transport(Arc::new(FailingTransport), macaroons())
            .expect("native runtime");
        match lnd.get_channels_balance().await {
            Err(ClientError::Transport(TransportError::Http(msg))) => {
                assert!(msg.contains("refused"))
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_path_arguments_checked_before_sending() {
        let t = ScriptedTransport::new(json!({}));
        let lnd = client(t.clone());
        let result = lnd.execute(Operation::GetGraphNode, &[], None).await;
        assert!(matches!(result, Err(ClientError::PathArguments { .. })));
        assert!(t.seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut cfg = config::Config::default();
        cfg.node.base_url = "https://lnd.example:8080".to_string();
        match LndRestClient::from_config(&cfg) {
            Err(ClientError::Config(config::ConfigError::MissingMacaroon(PrivilegeTier::Admin))) => {}
            other => panic!("expected MissingMacaroon, got {:?}", other),
        }

        cfg.macaroons.admin = Some("aa".to_string());
        cfg.macaroons.readonly = Some("bb".to_string());
        cfg.macaroons.invoice = Some("cc".to_string());
        let lnd = LndRestClient::from_config(&cfg).expect("client builds");
        assert_eq!(lnd.base_url(), "https://lnd.example:8080");
    }
}
