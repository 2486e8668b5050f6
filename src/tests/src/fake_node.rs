//! An in-process JSON-RPC node answering the handful of methods NEAR Shell uses.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use shell_core::{Balance, PublicKey};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use warp::{Filter, Rejection, Reply};

/// Block hash every `block` request returns.
pub const BLOCK_HASH_BYTES: [u8; 32] = [7u8; 32];

#[derive(Debug, Default)]
struct FakeAccount {
    amount: Balance,
    code_hash: String,
    /// Public key string and nonce of each access key
    keys: Vec<(String, u64)>,
}

#[derive(Debug, Default)]
struct NodeState {
    accounts: HashMap<String, FakeAccount>,
    views: HashMap<(String, String), Value>,
    transactions: Vec<String>,
}

/// A running fake node. The server lives as long as the test's runtime.
#[derive(Clone)]
pub struct FakeNode {
    addr: SocketAddr,
    state: Arc<Mutex<NodeState>>,
}

impl FakeNode {
    /// Starts a node on an ephemeral loopback port.
    pub fn start() -> Self {
        let state = Arc::new(Mutex::new(NodeState::default()));

        let rpc_route = warp::post()
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handle_rpc);
        let (addr, server) = warp::serve(rpc_route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        Self { addr, state }
    }

    /// Gets the URL to configure as `node_url`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Creates an account with `amount` yoctoNEAR and no keys.
    pub fn add_account(&self, account_id: &str, amount: Balance) {
        self.state.lock().unwrap().accounts.insert(
            account_id.to_string(),
            FakeAccount {
                amount,
                code_hash: "11111111111111111111111111111111".to_string(),
                keys: Vec::new(),
            },
        );
    }

    /// Adds a full access key to an existing account.
    pub fn add_key(&self, account_id: &str, public_key: &PublicKey, nonce: u64) {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .get_mut(account_id)
            .unwrap_or_else(|| panic!("unknown account {}", account_id));
        account.keys.push((public_key.to_string(), nonce));
    }

    /// Sets the JSON a view call returns.
    pub fn set_view_result(&self, contract_id: &str, method_name: &str, result: Value) {
        self.state
            .lock()
            .unwrap()
            .views
            .insert((contract_id.to_string(), method_name.to_string()), result);
    }

    /// Gets the base64 signed transactions broadcast so far.
    pub fn transactions(&self) -> Vec<String> {
        self.state.lock().unwrap().transactions.clone()
    }
}

fn with_state(
    state: Arc<Mutex<NodeState>>,
) -> impl Filter<Extract = (Arc<Mutex<NodeState>>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn handle_rpc(request: Value, state: Arc<Mutex<NodeState>>) -> Result<impl Reply, Rejection> {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    let result = {
        let mut state = state.lock().unwrap();
        match request.get("method").and_then(Value::as_str) {
            Some("query") => handle_query(&params, &state),
            Some("block") => Ok(json!({
                "header": {
                    "height": 1,
                    "hash": bs58::encode(BLOCK_HASH_BYTES).into_string(),
                }
            })),
            Some("broadcast_tx_commit") => handle_broadcast(&params, &mut state),
            _ => Err((-32601, "Method not found".to_string())),
        }
    };

    let response = match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message, "data": null },
        }),
    };
    Ok(warp::reply::json(&response))
}

fn handle_query(params: &Value, state: &NodeState) -> Result<Value, (i64, String)> {
    let field = |name: &str| params.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
    let account_id = field("account_id");

    match field("request_type").as_str() {
        "call_function" => {
            let method_name = field("method_name");
            let result = state
                .views
                .get(&(account_id.clone(), method_name.clone()))
                .ok_or_else(|| (-32000, format!("{} has no method {}", account_id, method_name)))?;
            let bytes = serde_json::to_vec(result).map_err(|e| (-32000, e.to_string()))?;
            // Make sure the arguments arrived intact
            STANDARD
                .decode(field("args_base64"))
                .map_err(|e| (-32602, e.to_string()))?;
            Ok(json!({ "result": bytes, "logs": [], "block_height": 1 }))
        }
        request_type => {
            let account = state
                .accounts
                .get(&account_id)
                .ok_or_else(|| (-32000, format!("account {} does not exist while viewing", account_id)))?;
            match request_type {
                "view_account" => Ok(json!({
                    "amount": account.amount.to_string(),
                    "locked": "0",
                    "code_hash": account.code_hash,
                    "storage_usage": 182,
                    "block_height": 1,
                    "block_hash": bs58::encode(BLOCK_HASH_BYTES).into_string(),
                })),
                "view_access_key_list" => Ok(json!({
                    "keys": account.keys.iter().map(|(public_key, nonce)| json!({
                        "public_key": public_key,
                        "access_key": { "nonce": nonce, "permission": "FullAccess" },
                    })).collect::<Vec<_>>(),
                    "block_height": 1,
                })),
                "view_access_key" => {
                    let public_key = field("public_key");
                    account
                        .keys
                        .iter()
                        .find(|(key, _)| *key == public_key)
                        .map(|(_, nonce)| json!({ "nonce": nonce, "permission": "FullAccess" }))
                        .ok_or_else(|| (-32000, format!("access key {} does not exist", public_key)))
                }
                other => Err((-32602, format!("unsupported request type {}", other))),
            }
        }
    }
}

fn handle_broadcast(params: &Value, state: &mut NodeState) -> Result<Value, (i64, String)> {
    let signed = params
        .get(0)
        .and_then(Value::as_str)
        .ok_or_else(|| (-32602, "expected a base64 transaction".to_string()))?;
    STANDARD.decode(signed).map_err(|e| (-32602, e.to_string()))?;
    state.transactions.push(signed.to_string());

    Ok(json!({
        "status": { "SuccessValue": "" },
        "transaction": { "hash": format!("tx{}", state.transactions.len()) },
        "receipts_outcome": [],
    }))
}
