//! Shared cw-multi-test harness for the token bridge integration tests.
//!
//! Besides the bridge and a stock cw20-base token, this sets up:
//! - a mock messenger that records every `SendMessage` it receives
//! - collaborators that call back into the bridge while it is mid-operation,
//!   used to prove the reentrancy guard holds across external calls

#![allow(dead_code)]

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, Event, MessageInfo, Reply, Response,
    StdResult, SubMsg, SubMsgResult, Uint128, WasmMsg,
};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use cw_storage_plus::Item;
use k256::ecdsa::SigningKey;

use token_bridge::hash::{evm_address_from_pubkey, evm_address_to_hex};
use token_bridge::msg::{
    ExecuteMsg, InstantiateMsg, MessengerExecuteMsg, ProcessedResponse, QueryMsg, StatsResponse,
};
use token_bridge::unlock_digest;

pub const LOCAL_CHAIN_ID: u64 = 1;
pub const REMOTE_CHAIN_ID: u64 = 56;
pub const MIN_AMOUNT: u128 = 1_000;
pub const MAX_AMOUNT: u128 = 1_000_000;
pub const USER_BALANCE: u128 = 5_000_000;
pub const CUSTODY_BALANCE: u128 = 10_000_000;

/// Reply id the hostile collaborators use for their nested call.
const REENTRY_REPLY_ID: u64 = 7;

// ============================================================================
// Contract Wrappers
// ============================================================================

fn contract_bridge() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        token_bridge::contract::execute,
        token_bridge::contract::instantiate,
        token_bridge::contract::query,
    )
    .with_reply(token_bridge::contract::reply);
    Box::new(contract)
}

fn contract_cw20() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

// ============================================================================
// Mock Messenger
// ============================================================================

/// A nested call a collaborator fires back at the bridge.
#[cw_serde]
pub struct ReentryPlan {
    pub target: String,
    pub msg: Binary,
}

#[cw_serde]
pub struct MessengerInstantiateMsg {
    pub reentry: Option<ReentryPlan>,
}

#[cw_serde]
pub struct SentMessage {
    pub sender: String,
    pub destination_chain_id: u64,
    pub recipient: String,
    pub payload: Binary,
}

const REENTRY: Item<ReentryPlan> = Item::new("reentry");
const REENTRY_ERRORS: Item<Vec<String>> = Item::new("reentry_errors");
const SENT: Item<Vec<SentMessage>> = Item::new("sent");

fn reentry_submsg(plan: ReentryPlan) -> SubMsg {
    SubMsg::reply_on_error(
        WasmMsg::Execute {
            contract_addr: plan.target,
            msg: plan.msg,
            funds: vec![],
        },
        REENTRY_REPLY_ID,
    )
}

/// Record the nested call's failure and swallow it so the outer call proceeds.
fn record_reentry_error(deps: DepsMut, _env: Env, msg: Reply) -> StdResult<Response> {
    if let SubMsgResult::Err(err) = msg.result {
        let mut errors = REENTRY_ERRORS.may_load(deps.storage)?.unwrap_or_default();
        errors.push(err);
        REENTRY_ERRORS.save(deps.storage, &errors)?;
    }
    Ok(Response::new())
}

fn messenger_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: MessengerInstantiateMsg,
) -> StdResult<Response> {
    SENT.save(deps.storage, &vec![])?;
    if let Some(plan) = msg.reentry {
        REENTRY.save(deps.storage, &plan)?;
    }
    Ok(Response::new())
}

fn messenger_execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: MessengerExecuteMsg,
) -> StdResult<Response> {
    let MessengerExecuteMsg::SendMessage {
        destination_chain_id,
        recipient,
        payload,
    } = msg;

    let mut sent = SENT.load(deps.storage)?;
    sent.push(SentMessage {
        sender: info.sender.to_string(),
        destination_chain_id,
        recipient,
        payload,
    });
    SENT.save(deps.storage, &sent)?;

    let mut res = Response::new().add_attribute("action", "send_message");
    if let Some(plan) = REENTRY.may_load(deps.storage)? {
        res = res.add_submessage(reentry_submsg(plan));
    }
    Ok(res)
}

fn messenger_query(deps: Deps, _env: Env, _msg: Empty) -> StdResult<Binary> {
    to_json_binary(&SENT.load(deps.storage)?)
}

fn contract_messenger() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(messenger_execute, messenger_instantiate, messenger_query)
        .with_reply(record_reentry_error);
    Box::new(contract)
}

// ============================================================================
// Hostile Token
// ============================================================================

#[cw_serde]
pub struct HostileTokenInstantiateMsg {
    pub token: cw20_base::msg::InstantiateMsg,
    pub reentry: ReentryPlan,
}

fn hostile_token_instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: HostileTokenInstantiateMsg,
) -> Result<Response, cw20_base::ContractError> {
    let res = cw20_base::contract::instantiate(deps.branch(), env, info, msg.token)?;
    REENTRY.save(deps.storage, &msg.reentry)?;
    Ok(res)
}

/// A cw20 that calls back into the bridge whenever the bridge moves tokens.
fn hostile_token_execute(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: Cw20ExecuteMsg,
) -> Result<Response, cw20_base::ContractError> {
    let plan = REENTRY.load(deps.storage)?;
    let from_bridge = info.sender.as_str() == plan.target;

    let mut res = cw20_base::contract::execute(deps.branch(), env, info, msg)?;
    if from_bridge {
        res = res.add_submessage(reentry_submsg(plan));
    }
    Ok(res)
}

fn contract_hostile_token() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        hostile_token_execute,
        hostile_token_instantiate,
        cw20_base::contract::query,
    )
    .with_reply(record_reentry_error);
    Box::new(contract)
}

// ============================================================================
// Validator Keys
// ============================================================================

pub fn validator_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

pub fn validator_keys(count: u8) -> Vec<SigningKey> {
    (1..=count).map(validator_key).collect()
}

pub fn validator_address(key: &SigningKey) -> String {
    let point = key.verifying_key().to_encoded_point(false);
    evm_address_to_hex(&evm_address_from_pubkey(point.as_bytes()).unwrap())
}

/// 65-byte `r || s || v` signature with `v` in {27, 28}.
pub fn sign_digest(key: &SigningKey, digest: &[u8; 32]) -> Binary {
    let (signature, recovery_id) = key.sign_prehash_recoverable(digest).unwrap();
    let mut bytes = signature.to_bytes().to_vec();
    bytes.push(recovery_id.to_byte() + 27);
    Binary::from(bytes)
}

/// Sign the canonical unlock message for this test chain.
pub fn sign_unlock(
    keys: &[SigningKey],
    recipient: &Addr,
    amount: u128,
    transfer_id: [u8; 32],
    source_chain_id: u64,
) -> Vec<Binary> {
    let digest = unlock_digest(
        recipient.as_str(),
        amount,
        &transfer_id,
        source_chain_id,
        LOCAL_CHAIN_ID,
    );
    keys.iter().map(|key| sign_digest(key, &digest)).collect()
}

pub fn transfer_id(seed: u8) -> [u8; 32] {
    let mut id = [0u8; 32];
    id[0] = 0xb1;
    id[31] = seed;
    id
}

// ============================================================================
// Test Environment
// ============================================================================

pub struct TestEnv {
    pub app: App,
    pub owner: Addr,
    pub user: Addr,
    pub relayer: Addr,
    pub token: Addr,
    pub messenger: Addr,
    pub bridge: Addr,
    pub validators: Vec<SigningKey>,
}

fn cw20_instantiate_msg(initial_balances: Vec<Cw20Coin>) -> cw20_base::msg::InstantiateMsg {
    cw20_base::msg::InstantiateMsg {
        name: "Bridged Token".to_string(),
        symbol: "BRG".to_string(),
        decimals: 6,
        initial_balances,
        mint: None,
        marketing: None,
    }
}

/// Bridge with `validator_count` validators, a funded user, and custody
/// pre-funded with `CUSTODY_BALANCE`.
pub fn setup(validator_count: u8) -> TestEnv {
    let mut app = App::default();
    let owner = Addr::unchecked("terra1owner");
    let user = Addr::unchecked("terra1user");
    let relayer = Addr::unchecked("terra1relayer");
    let treasury = Addr::unchecked("terra1treasury");

    let cw20_code_id = app.store_code(contract_cw20());
    let token = app
        .instantiate_contract(
            cw20_code_id,
            owner.clone(),
            &cw20_instantiate_msg(vec![
                Cw20Coin {
                    address: user.to_string(),
                    amount: Uint128::new(USER_BALANCE),
                },
                Cw20Coin {
                    address: treasury.to_string(),
                    amount: Uint128::new(CUSTODY_BALANCE),
                },
            ]),
            &[],
            "token",
            None,
        )
        .unwrap();

    let messenger_code_id = app.store_code(contract_messenger());
    let messenger = app
        .instantiate_contract(
            messenger_code_id,
            owner.clone(),
            &MessengerInstantiateMsg { reentry: None },
            &[],
            "messenger",
            None,
        )
        .unwrap();

    let validators = validator_keys(validator_count);
    let bridge_code_id = app.store_code(contract_bridge());
    let bridge = app
        .instantiate_contract(
            bridge_code_id,
            owner.clone(),
            &InstantiateMsg {
                owner: owner.to_string(),
                token: token.to_string(),
                messenger: messenger.to_string(),
                local_chain_id: LOCAL_CHAIN_ID,
                min_amount: Uint128::new(MIN_AMOUNT),
                max_amount: Uint128::new(MAX_AMOUNT),
                validators: validators.iter().map(validator_address).collect(),
            },
            &[],
            "token-bridge",
            Some(owner.to_string()),
        )
        .unwrap();

    app.execute_contract(
        treasury,
        token.clone(),
        &Cw20ExecuteMsg::Transfer {
            recipient: bridge.to_string(),
            amount: Uint128::new(CUSTODY_BALANCE),
        },
        &[],
    )
    .unwrap();

    TestEnv {
        app,
        owner,
        user,
        relayer,
        token,
        messenger,
        bridge,
        validators,
    }
}

/// Swap the bridge's messenger for one that re-enters with `nested`.
pub fn install_hostile_messenger(env: &mut TestEnv, nested: &ExecuteMsg) -> Addr {
    let code_id = env.app.store_code(contract_messenger());
    let messenger = env
        .app
        .instantiate_contract(
            code_id,
            env.owner.clone(),
            &MessengerInstantiateMsg {
                reentry: Some(ReentryPlan {
                    target: env.bridge.to_string(),
                    msg: to_json_binary(nested).unwrap(),
                }),
            },
            &[],
            "hostile-messenger",
            None,
        )
        .unwrap();
    let owner = env.owner.clone();
    execute(
        env,
        &owner,
        &ExecuteMsg::SetMessenger {
            messenger: messenger.to_string(),
        },
    )
    .unwrap();
    env.messenger = messenger.clone();
    messenger
}

/// Swap the bridge's token for one that re-enters with `nested` whenever the
/// bridge moves tokens. Custody and the user are funded on the new token.
pub fn install_hostile_token(env: &mut TestEnv, nested: &ExecuteMsg) -> Addr {
    let code_id = env.app.store_code(contract_hostile_token());
    let token = env
        .app
        .instantiate_contract(
            code_id,
            env.owner.clone(),
            &HostileTokenInstantiateMsg {
                token: cw20_instantiate_msg(vec![
                    Cw20Coin {
                        address: env.user.to_string(),
                        amount: Uint128::new(USER_BALANCE),
                    },
                    Cw20Coin {
                        address: env.bridge.to_string(),
                        amount: Uint128::new(CUSTODY_BALANCE),
                    },
                ]),
                reentry: ReentryPlan {
                    target: env.bridge.to_string(),
                    msg: to_json_binary(nested).unwrap(),
                },
            },
            &[],
            "hostile-token",
            None,
        )
        .unwrap();
    let owner = env.owner.clone();
    execute(
        env,
        &owner,
        &ExecuteMsg::SetToken {
            token: token.to_string(),
        },
    )
    .unwrap();
    env.token = token.clone();
    token
}

/// Errors the hostile collaborator caught from its nested call.
pub fn reentry_errors(env: &TestEnv, collaborator: &Addr) -> Vec<String> {
    REENTRY_ERRORS
        .query(&env.app.wrap(), collaborator.clone())
        .unwrap_or_default()
}

// ============================================================================
// Actions
// ============================================================================

/// Execute a bridge message, flattening any error into its full cause chain.
pub fn execute(env: &mut TestEnv, sender: &Addr, msg: &ExecuteMsg) -> Result<AppResponse, String> {
    env.app
        .execute_contract(sender.clone(), env.bridge.clone(), msg, &[])
        .map_err(|err| format!("{err:?}"))
}

/// Grant the bridge an allowance on the user's tokens.
pub fn approve(env: &mut TestEnv, amount: u128) {
    env.app
        .execute_contract(
            env.user.clone(),
            env.token.clone(),
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: env.bridge.to_string(),
                amount: Uint128::new(amount),
                expires: None,
            },
            &[],
        )
        .unwrap();
}

pub fn lock(env: &mut TestEnv, amount: u128, id: [u8; 32]) -> Result<AppResponse, String> {
    let user = env.user.clone();
    execute(
        env,
        &user,
        &ExecuteMsg::Lock {
            amount: Uint128::new(amount),
            transfer_id: Binary::from(id.to_vec()),
            destination_chain_id: REMOTE_CHAIN_ID,
        },
    )
}

pub fn unlock_msg(
    recipient: &Addr,
    amount: u128,
    id: [u8; 32],
    signatures: Vec<Binary>,
) -> ExecuteMsg {
    ExecuteMsg::Unlock {
        recipient: recipient.to_string(),
        amount: Uint128::new(amount),
        transfer_id: Binary::from(id.to_vec()),
        source_chain_id: REMOTE_CHAIN_ID,
        signatures,
    }
}

/// Unlock to the user signed by the first `signers` validators.
pub fn unlock(
    env: &mut TestEnv,
    amount: u128,
    id: [u8; 32],
    signers: usize,
) -> Result<AppResponse, String> {
    let user = env.user.clone();
    let relayer = env.relayer.clone();
    let signatures = sign_unlock(
        &env.validators[..signers],
        &user,
        amount,
        id,
        REMOTE_CHAIN_ID,
    );
    execute(env, &relayer, &unlock_msg(&user, amount, id, signatures))
}

pub fn relay_msg(sender: &Addr, amount: u128, id: [u8; 32]) -> ExecuteMsg {
    let payload = token_bridge::payload::RelayPayload::new(
        sender.as_str(),
        Uint128::new(amount),
        &token_bridge::TransferId::new(id),
    );
    ExecuteMsg::ReceiveRelayedMessage {
        source_chain_id: REMOTE_CHAIN_ID,
        sender: "0x00000000000000000000000000000000000b71d9".to_string(),
        payload: payload.encode().unwrap(),
    }
}

// ============================================================================
// Queries
// ============================================================================

pub fn balance(env: &TestEnv, address: &Addr) -> u128 {
    let res: BalanceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            env.token.clone(),
            &Cw20QueryMsg::Balance {
                address: address.to_string(),
            },
        )
        .unwrap();
    res.balance.u128()
}

pub fn is_processed(env: &TestEnv, id: [u8; 32]) -> bool {
    let res: ProcessedResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            env.bridge.clone(),
            &QueryMsg::IsProcessed {
                transfer_id: Binary::from(id.to_vec()),
            },
        )
        .unwrap();
    res.processed
}

pub fn stats(env: &TestEnv) -> StatsResponse {
    env.app
        .wrap()
        .query_wasm_smart(env.bridge.clone(), &QueryMsg::Stats {})
        .unwrap()
}

pub fn sent_messages(env: &TestEnv) -> Vec<SentMessage> {
    SENT.query(&env.app.wrap(), env.messenger.clone()).unwrap()
}

// ============================================================================
// Events
// ============================================================================

/// Find a custom event emitted by a contract (multi-test prefixes `wasm-`).
pub fn find_event<'a>(res: &'a AppResponse, ty: &str) -> Option<&'a Event> {
    let ty = format!("wasm-{ty}");
    res.events.iter().find(|event| event.ty == ty)
}

pub fn attr<'a>(event: &'a Event, key: &str) -> Option<&'a str> {
    event
        .attributes
        .iter()
        .find(|attribute| attribute.key == key)
        .map(|attribute| attribute.value.as_str())
}

pub fn assert_err_contains(res: Result<AppResponse, String>, needle: &str) {
    let err = res.expect_err("expected the call to fail");
    assert!(
        err.contains(needle),
        "expected error containing {needle:?}, got: {err}"
    );
}
