use crate::{
    data::{AccountId, Error, Message},
    read::MessageUser,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// This is where accounts are stored; they are created on the fly when reading the
/// messages. Keys iterate in ascending phone number order, which is the order
/// accounts get listed in. Single-threaded, so no protections for MT.
#[derive(Debug, Default)]
pub(crate) struct Accounts {
    pub accounts: BTreeMap<AccountId, Vec<Message>>,
}

impl Accounts {
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
        }
    }

    /// Removes the earliest media message of every account. Accounts without
    /// one are left alone, and an account emptied this way stays in the store.
    pub fn purge_first_media(&mut self) {
        for (id, msgs) in self.accounts.iter_mut() {
            if let Some(pos) = msgs.iter().position(Message::is_media) {
                let msg = msgs.remove(pos);
                log::debug!("Erased media message sent at {} from {id}", msg.time());
            }
        }
    }

    /// Removes an account and all its messages, returning what it was charged
    /// for them. An account whose total can't be computed is kept.
    pub fn disconnect(&mut self, id: &str) -> Result<Decimal, Error> {
        let msgs = self
            .accounts
            .get(id)
            .ok_or_else(|| Error::AccountNotFound(id.to_owned()))?;
        let total = total_charges(id, msgs)?;
        let count = msgs.len();
        self.accounts.remove(id);
        log::info!("Disconnected account {id} ({count} messages)");
        Ok(total)
    }
}

impl MessageUser for Accounts {
    fn use_msg(&mut self, msg: Message) {
        self.accounts
            .entry(msg.sender().to_owned())
            .or_default()
            .push(msg);
    }
}

/// Sum of the charges of one account's messages
pub(crate) fn total_charges(id: &str, msgs: &[Message]) -> Result<Decimal, Error> {
    msgs.iter().try_fold(Decimal::ZERO, |total, msg| {
        total
            .checked_add(msg.charge())
            .ok_or_else(|| Error::ChargeOverflow(id.to_owned()))
    })
}
