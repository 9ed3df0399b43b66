use crate::{
    compute::{total_charges, Accounts},
    data::{Message, Payload},
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

const SEPARATOR: &str = "--------------------------------------------------";

/// Shown in the banner when no location was configured
pub const UNKNOWN_LOCATION: &str = "Location not specified";

/// Renders the banner and the list of menu entries
pub(crate) fn write_menu<W: Write>(
    writer: &mut W,
    location: &str,
) -> Result<(), anyhow::Error> {
    writeln!(writer)?;
    writeln!(writer, "{:>40}", format!("FOOTHILL WIRELESS at {location}"))?;
    writeln!(writer, " {:>42}", "MESSAGE UTILIZATION AND ACCOUNT ADMIN")?;
    writeln!(writer, " {:<20}", "1. List all accounts")?;
    writeln!(writer, " {:<34}", "2. Erase the first media message")?;
    writeln!(writer, " {:<21}", "3. Disconnect account")?;
    writeln!(writer, " {:<7}", "4. Quit")?;
    writer.flush()?;
    Ok(())
}

/// Account report: every message of every account, then what the account
/// is charged in total.
pub(crate) fn write_accounts<W: Write>(
    writer: &mut W,
    accounts: &Accounts,
) -> Result<(), anyhow::Error> {
    writeln!(writer, "{:>40}", "LIST OF ALL ACCOUNTS")?;
    writeln!(writer, "{SEPARATOR}")?;
    for (id, msgs) in &accounts.accounts {
        writeln!(writer, "Account: {id}")?;
        for msg in msgs {
            write_message(writer, msg)?;
        }
        match total_charges(id, msgs) {
            Ok(total) => writeln!(writer, "{:<14} {}", "Total charges: ", money(total))?,
            Err(e) => {
                log::warn!("{e}");
                writeln!(writer, "{e}")?;
            }
        }
        writeln!(writer, "{SEPARATOR}")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_message<W: Write>(writer: &mut W, msg: &Message) -> Result<(), anyhow::Error> {
    let detail = match msg.payload() {
        Payload::Text { body } => format!("TEXT: {body}"),
        Payload::Media { size, format } => {
            format!("MEDIA: Size: {} MB, Format: {format}", megabytes(*size))
        }
        Payload::Voice { duration, format } => {
            format!("VOICE: Duration: {duration}(sec), Format:{format}")
        }
    };
    writeln!(
        writer,
        "   {:<47}{:<15} {:<20} {:<18}",
        detail,
        format!("Time:{},", msg.time()),
        format!("From:{},", msg.sender()),
        format!("To:{},", msg.receiver()),
    )?;
    Ok(())
}

/// Sizes drop trailing zeros but keep one decimal, so `2.50` shows as `2.5`
/// and `3` as `3.0`.
fn megabytes(size: Decimal) -> String {
    let size = size.normalize();
    if size.scale() == 0 {
        format!("{size}.0")
    } else {
        size.to_string()
    }
}

/// Charges are shown rounded to the cent, half a cent rounding up
pub(crate) fn money(amount: Decimal) -> String {
    let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{amount:.2}")
}
