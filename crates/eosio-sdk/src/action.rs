//! Actions, authorizations and action data

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use eosio_abi::{write_blob, AbiEncode, AbiType, AbiValue, Name, Varuint32};
use serde_json::{json, Value};

use crate::net::Net;
use crate::SdkError;

/// Maximum authorizations per action
pub const MAX_AUTHORIZATIONS: usize = 10;

/// `actor@permission` pair authorizing an action
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authorization {
    actor: Name,
    permission: Name,
}

impl Authorization {
    /// Both names must be valid and non-empty
    pub fn new(actor: &str, permission: &str) -> Result<Self, SdkError> {
        Ok(Self {
            actor: non_empty_name("actor", actor)?,
            permission: non_empty_name("permission", permission)?,
        })
    }

    /// Authorizing account
    pub fn actor(&self) -> &Name {
        &self.actor
    }

    /// Permission level, usually `active` or `owner`
    pub fn permission(&self) -> &Name {
        &self.permission
    }
}

fn non_empty_name(field: &str, value: &str) -> Result<Name, SdkError> {
    if value.is_empty() {
        return Err(SdkError::Validation(format!("{} must not be empty", field)));
    }
    Ok(Name::new(value)?)
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

impl AbiEncode for Authorization {
    fn encode(&self, out: &mut Vec<u8>) {
        self.actor.encode(out);
        self.permission.encode(out);
    }
}

/// One named, typed field of an action payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Data {
    name: String,
    value: AbiValue,
}

impl Data {
    /// Field `name` holding `value`
    pub fn new(name: impl Into<String>, value: impl Into<AbiValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Build from `{"name": .., "type": .., "value": ..}`
    ///
    /// Exactly these three keys must be present. `type` is looked up in the
    /// type registry and `value` is validated against it.
    pub fn from_json(json: &Value) -> Result<Self, SdkError> {
        let object = json
            .as_object()
            .ok_or_else(|| SdkError::Validation(format!("data must be an object, got {}", json)))?;

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        if keys != ["name", "type", "value"] {
            return Err(SdkError::Validation(format!(
                "data needs exactly the keys name, type and value, got {:?}",
                keys
            )));
        }

        let name = object["name"]
            .as_str()
            .ok_or_else(|| SdkError::Validation("data name must be a string".into()))?;
        let type_name = object["type"]
            .as_str()
            .ok_or_else(|| SdkError::Validation("data type must be a string".into()))?;
        let abi_type = AbiType::from_name(type_name)?;
        let value = abi_type.value_from_json(&object["value"])?;

        Ok(Self {
            name: name.to_string(),
            value,
        })
    }

    /// Inverse of [`Data::from_json`]
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.value.abi_type().to_string(),
            "value": self.value.to_json(),
        })
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field value
    pub fn value(&self) -> &AbiValue {
        &self.value
    }
}

impl AbiEncode for Data {
    fn encode(&self, out: &mut Vec<u8>) {
        self.value.encode(out);
    }
}

/// Contract action before it is bound to a network
///
/// There is no byte encoding for an unlinked action; call [`Action::link`].
///
/// ```compile_fail
/// use eosio_abi::AbiEncode;
/// use eosio_sdk::{Action, Authorization};
///
/// let auth = Authorization::new("user2", "active").unwrap();
/// let action = Action::new("user2", "sendmsg", vec![auth], vec![]).unwrap();
/// let _ = action.to_bytes();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    account: Name,
    name: Name,
    authorization: Vec<Authorization>,
    data: Vec<Data>,
}

impl Action {
    /// Create an action with 1 to 10 authorizations
    pub fn new(
        account: &str,
        name: &str,
        authorization: Vec<Authorization>,
        data: Vec<Data>,
    ) -> Result<Self, SdkError> {
        if authorization.is_empty() || authorization.len() > MAX_AUTHORIZATIONS {
            return Err(SdkError::Validation(format!(
                "action needs 1 to {} authorizations, got {}",
                MAX_AUTHORIZATIONS,
                authorization.len()
            )));
        }
        Ok(Self {
            account: Name::new(account)?,
            name: Name::new(name)?,
            authorization,
            data,
        })
    }

    /// Contract account
    pub fn account(&self) -> &Name {
        &self.account
    }

    /// Action name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Authorizations in order
    pub fn authorization(&self) -> &[Authorization] {
        &self.authorization
    }

    /// Payload fields in order
    pub fn data(&self) -> &[Data] {
        &self.data
    }

    /// Bind to a network, enabling serialization
    pub fn link(self, net: Arc<dyn Net>) -> LinkedAction {
        LinkedAction { action: self, net }
    }
}

/// Action bound to a network
///
/// Equality and hashing ignore the network handle.
#[derive(Clone)]
pub struct LinkedAction {
    action: Action,
    net: Arc<dyn Net>,
}

impl LinkedAction {
    /// The action as created
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Network the action is bound to
    pub fn net(&self) -> &Arc<dyn Net> {
        &self.net
    }

    /// Concatenated encodings of all data fields
    pub fn data_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for field in &self.action.data {
            field.encode(&mut out);
        }
        out
    }
}

impl std::ops::Deref for LinkedAction {
    type Target = Action;

    fn deref(&self) -> &Action {
        &self.action
    }
}

impl AbiEncode for LinkedAction {
    fn encode(&self, out: &mut Vec<u8>) {
        self.action.account.encode(out);
        self.action.name.encode(out);
        Varuint32::from(self.action.authorization.len() as u32).encode(out);
        for auth in &self.action.authorization {
            auth.encode(out);
        }
        write_blob(out, &self.data_bytes());
    }
}

impl fmt::Debug for LinkedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedAction")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

impl PartialEq for LinkedAction {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
    }
}

impl Eq for LinkedAction {}

impl Hash for LinkedAction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.action.hash(state);
    }
}
