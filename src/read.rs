use crate::data::{AccountId, Error, Message, Payload, Timestamp};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize};

/// Trait for doing something with a `Message` read from the message file.
/// Used to build the `Accounts` store, but also used for mock tests to check we
/// get the correct results from reading a stream.
pub(crate) trait MessageUser {
    fn use_msg(&mut self, msg: Message);
}

/// What happened to the lines of one input file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReadSummary {
    pub accepted: usize,
    pub skipped: usize,
}

const TEXT_FIELDS: &[&str] = &["type", "time", "sender", "receiver", "body", "charge"];
const MEDIA_FIELDS: &[&str] = &[
    "type", "time", "sender", "receiver", "size", "format", "charge",
];
const VOICE_FIELDS: &[&str] = &[
    "type", "time", "sender", "receiver", "duration", "format", "charge",
];

// Row layouts, one per message type. There is no header line so csv fills
// these positionally. Decimals stay text until `decimal` so a bad value can be
// reported with its field name.

#[derive(Debug, Deserialize)]
struct TextRow {
    _tag: String,
    time: Timestamp,
    sender: AccountId,
    receiver: AccountId,
    body: String,
    charge: String,
}

#[derive(Debug, Deserialize)]
struct MediaRow {
    _tag: String,
    time: Timestamp,
    sender: AccountId,
    receiver: AccountId,
    size: String,
    format: String,
    charge: String,
}

#[derive(Debug, Deserialize)]
struct VoiceRow {
    _tag: String,
    time: Timestamp,
    sender: AccountId,
    receiver: AccountId,
    duration: i64,
    format: String,
    charge: String,
}

/// Reads messages, one per line, and hands each one to `user`. Lines that
/// can't be turned into a message are reported and skipped; only a failure
/// to read the stream itself aborts the import.
pub(crate) fn read_messages<R: std::io::Read, U: MessageUser>(
    reader: R,
    user: &mut U,
) -> Result<ReadSummary, anyhow::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut summary = ReadSummary::default();
    for result in rdr.records() {
        let record = result?;
        match parse_record(&record) {
            Ok(msg) => {
                user.use_msg(msg);
                summary.accepted += 1;
            }
            Err(e) => {
                log::warn!("Skipping message: {e}");
                summary.skipped += 1;
            }
        }
    }
    Ok(summary)
}

/// Turns one input line into a `Message`, dispatching on its type tag
pub(crate) fn parse_record(record: &StringRecord) -> Result<Message, Error> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    let tag = record.get(0).unwrap_or_default();
    let (time, sender, receiver, charge, payload) = match tag.to_ascii_uppercase().as_str() {
        "T" => {
            let row: TextRow = deserialize_row(record, TEXT_FIELDS, line)?;
            let payload = Payload::Text { body: row.body };
            let charge = decimal(&row.charge, "charge", line)?;
            (row.time, row.sender, row.receiver, charge, payload)
        }
        "M" => {
            let row: MediaRow = deserialize_row(record, MEDIA_FIELDS, line)?;
            let payload = Payload::Media {
                size: decimal(&row.size, "size", line)?,
                format: row.format,
            };
            let charge = decimal(&row.charge, "charge", line)?;
            (row.time, row.sender, row.receiver, charge, payload)
        }
        "V" => {
            let row: VoiceRow = deserialize_row(record, VOICE_FIELDS, line)?;
            let payload = Payload::Voice {
                duration: row.duration,
                format: row.format,
            };
            let charge = decimal(&row.charge, "charge", line)?;
            (row.time, row.sender, row.receiver, charge, payload)
        }
        _ => {
            return Err(Error::UnknownTag {
                line,
                tag: tag.to_owned(),
            })
        }
    };
    if charge.is_sign_negative() {
        return Err(Error::NegativeCharge { line, charge });
    }
    Ok(Message::new(time, sender, receiver, charge, payload))
}

fn decimal(value: &str, field: &'static str, line: u64) -> Result<Decimal, Error> {
    value.parse().map_err(|_| Error::Format {
        line,
        field,
        value: value.to_owned(),
    })
}

/// Deserializes `record` into a row, naming the offending field if it fails.
fn deserialize_row<T: DeserializeOwned>(
    record: &StringRecord,
    fields: &[&'static str],
    line: u64,
) -> Result<T, Error> {
    if let Some(&field) = fields.get(record.len()) {
        return Err(Error::MissingField { line, field });
    }
    record.deserialize(None).map_err(|e| {
        let index = match e.kind() {
            csv::ErrorKind::Deserialize { err, .. } => err.field().map(|f| f as usize),
            _ => None,
        };
        match index.and_then(|i| Some((fields.get(i)?, record.get(i)?))) {
            Some((&field, value)) => Error::Format {
                line,
                field,
                value: value.to_owned(),
            },
            None => Error::Format {
                line,
                field: "record",
                value: record.iter().collect::<Vec<_>>().join(","),
            },
        }
    })
}
