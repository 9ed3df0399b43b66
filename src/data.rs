use rust_decimal::Decimal;
use thiserror::Error;

/// Accounts are identified by the owner's phone number, kept verbatim.
pub type AccountId = String;
pub type Timestamp = i64;

/// One message event. The fields every kind of message shares live here, what
/// differs lives in `payload`. Matching on the payload is the only way to tell
/// kinds apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Message {
    time: Timestamp,
    sender: AccountId,
    receiver: AccountId,
    charge: Decimal,
    payload: Payload,
}

/// Kind-specific part of a `Message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Payload {
    Text { body: String },
    Media { size: Decimal, format: String },
    Voice { duration: i64, format: String },
}

impl Message {
    pub fn new(
        time: Timestamp,
        sender: AccountId,
        receiver: AccountId,
        charge: Decimal,
        payload: Payload,
    ) -> Self {
        Self {
            time,
            sender,
            receiver,
            charge,
            payload,
        }
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn charge(&self) -> Decimal {
        self.charge
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_media(&self) -> bool {
        matches!(self.payload, Payload::Media { .. })
    }
}

/// The sender has no setter: it is the key the message is filed under.
#[allow(dead_code)]
impl Message {
    pub fn set_time(&mut self, time: Timestamp) {
        self.time = time;
    }

    pub fn set_receiver(&mut self, receiver: AccountId) {
        self.receiver = receiver;
    }

    pub fn set_charge(&mut self, charge: Decimal) {
        self.charge = charge;
    }

    pub fn set_payload(&mut self, payload: Payload) {
        self.payload = payload;
    }
}

/// Errors raised while reading messages or operating on accounts. Line numbers
/// are 1-based, as a text editor would show them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Line {line}: field `{field}` has invalid value {value:?}")]
    Format {
        line: u64,
        field: &'static str,
        value: String,
    },
    #[error("Line {line}: field `{field}` is missing")]
    MissingField { line: u64, field: &'static str },
    #[error("Line {line}: unknown message type {tag:?}")]
    UnknownTag { line: u64, tag: String },
    #[error("Line {line}: charge must not be negative (got {charge})")]
    NegativeCharge { line: u64, charge: Decimal },
    #[error("Account {0} does not exist!")]
    AccountNotFound(AccountId),
    #[error("Total charges for account {0} are too large to add up")]
    ChargeOverflow(AccountId),
}
