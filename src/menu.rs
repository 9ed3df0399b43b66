use crate::{
    compute::Accounts,
    write::{money, write_accounts, write_menu, UNKNOWN_LOCATION},
};
use std::io::{BufRead, Write};

/// Menu entries, numbered the way they are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Choice {
    List,
    PurgeMedia,
    Disconnect,
    Quit,
}

impl Choice {
    /// Anything that isn't one of the menu numbers gives `None`
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<i32>().ok()? {
            1 => Some(Choice::List),
            2 => Some(Choice::PurgeMedia),
            3 => Some(Choice::Disconnect),
            4 => Some(Choice::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Menu,
    Dispatch(Choice),
    Terminated,
}

/// Owns the accounts for the whole session and runs the admin menu over them
#[derive(Debug)]
pub(crate) struct Carrier {
    accounts: Accounts,
    location: String,
}

impl Carrier {
    pub fn new(accounts: Accounts, location: impl Into<String>) -> Self {
        let location = location.into();
        let location = if location.trim().is_empty() {
            UNKNOWN_LOCATION.to_owned()
        } else {
            location
        };
        Self { accounts, location }
    }

    #[cfg(test)]
    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    /// Shows the menu and applies the picked operation until the user quits.
    /// Running out of input counts as quitting.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<(), anyhow::Error> {
        let mut state = State::Menu;
        loop {
            state = match state {
                State::Menu => {
                    write_menu(&mut output, &self.location)?;
                    match read_line(&mut input)? {
                        None => State::Terminated,
                        Some(line) => match Choice::parse(&line) {
                            Some(choice) => State::Dispatch(choice),
                            None => {
                                log::debug!("Ignoring menu input {line:?}");
                                State::Menu
                            }
                        },
                    }
                }
                State::Dispatch(Choice::Quit) => State::Terminated,
                State::Dispatch(choice) => {
                    self.dispatch(choice, &mut input, &mut output)?;
                    State::Menu
                }
                State::Terminated => break,
            };
        }
        Ok(())
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        choice: Choice,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), anyhow::Error> {
        match choice {
            Choice::List => write_accounts(output, &self.accounts)?,
            Choice::PurgeMedia => self.accounts.purge_first_media(),
            Choice::Disconnect => self.disconnect(input, output)?,
            Choice::Quit => {}
        }
        Ok(())
    }

    fn disconnect<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), anyhow::Error> {
        writeln!(
            output,
            "Enter the phone number of the account you would like to disconnect: "
        )?;
        output.flush()?;
        let Some(id) = read_line(input)? else {
            return Ok(());
        };
        match self.accounts.disconnect(&id) {
            Ok(total) => writeln!(output, "Total charges for account {id}: {}", money(total))?,
            Err(e) => {
                log::info!("Disconnect refused: {e}");
                writeln!(output, "{e}")?;
            }
        }
        Ok(())
    }
}

/// One line of input without its line ending, or `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>, anyhow::Error> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_owned()))
}

#[cfg(test)]
mod tests {
    use crate::{compute::Accounts, read::read_messages};

    use super::{Carrier, Choice};

    const MESSAGES: &[u8] = b"\
T,144840960,1-408-111-0222,1-650-111-0000,Are you going to the movie tonight?,0.50
M,144840961,1-408-111-0222,1-650-217-2003,2.75,GIF,1.25
V,144840962,1-408-222-0222,1-650-812-0011,670,MOV,7.00
";

    fn carrier() -> Carrier {
        let mut accounts = Accounts::new();
        read_messages(MESSAGES, &mut accounts).unwrap();
        Carrier::new(accounts, "Palo Alto")
    }

    fn session(carrier: &mut Carrier, script: &str) -> String {
        let mut out = Vec::new();
        carrier.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn ids(carrier: &Carrier) -> Vec<String> {
        carrier.accounts().accounts.keys().cloned().collect()
    }

    #[test]
    fn test_choice() {
        assert_eq!(Choice::parse("1"), Some(Choice::List));
        assert_eq!(Choice::parse(" 2 "), Some(Choice::PurgeMedia));
        assert_eq!(Choice::parse("3"), Some(Choice::Disconnect));
        assert_eq!(Choice::parse("4"), Some(Choice::Quit));
        assert_eq!(Choice::parse("5"), None);
        assert_eq!(Choice::parse("0"), None);
        assert_eq!(Choice::parse("list"), None);
        assert_eq!(Choice::parse(""), None);
    }

    #[test]
    fn test_full_session() {
        let mut carrier = carrier();
        let out = session(&mut carrier, "1\n2\n1\n3\n1-408-222-0222\n1\n4\n");
        let reports: Vec<_> = out.split("LIST OF ALL ACCOUNTS").skip(1).collect();
        assert_eq!(reports.len(), 3);

        let first = reports[0];
        let a = first.find("Account: 1-408-111-0222").unwrap();
        let b = first.find("Account: 1-408-222-0222").unwrap();
        assert!(a < b);
        assert!(first.contains("Total charges:  1.75"));
        assert!(first.contains("Total charges:  7.00"));

        let second = reports[1];
        assert!(second.contains("Total charges:  0.50"));
        assert!(!second.contains("MEDIA:"));
        assert_eq!(second.matches("TEXT:").count(), 1);

        assert!(out.contains("Total charges for account 1-408-222-0222: 7.00"));
        let third = reports[2];
        assert!(third.contains("Account: 1-408-111-0222"));
        assert!(!third.contains("1-408-222-0222"));
        assert_eq!(ids(&carrier), ["1-408-111-0222"]);
    }

    #[test]
    fn test_disconnect_unknown() {
        let mut carrier = carrier();
        let out = session(&mut carrier, "3\n1-408-999-9999\n4\n");
        assert!(out.contains("Account 1-408-999-9999 does not exist!"));
        assert_eq!(ids(&carrier), ["1-408-111-0222", "1-408-222-0222"]);
        assert_eq!(carrier.accounts().accounts["1-408-111-0222"].len(), 2);
    }

    #[test]
    fn test_bad_input_is_ignored() {
        let mut carrier = carrier();
        let out = session(&mut carrier, "hello\n9\n\n4\n");
        assert_eq!(out.matches("FOOTHILL WIRELESS at Palo Alto").count(), 4);
        assert!(!out.contains("LIST OF ALL ACCOUNTS"));
        assert_eq!(ids(&carrier), ["1-408-111-0222", "1-408-222-0222"]);
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut carrier = carrier();
        let out = session(&mut carrier, "4\n2\n");
        assert_eq!(out.matches("FOOTHILL WIRELESS").count(), 1);
        assert_eq!(carrier.accounts().accounts["1-408-111-0222"].len(), 2);
    }

    #[test]
    fn test_end_of_input_quits() {
        let mut carrier = carrier();
        let out = session(&mut carrier, "2\n");
        assert_eq!(out.matches("FOOTHILL WIRELESS").count(), 2);
        assert_eq!(carrier.accounts().accounts["1-408-111-0222"].len(), 1);
    }

    #[test]
    fn test_disconnect_overflow_keeps_session() {
        let mut accounts = Accounts::new();
        read_messages(
            &b"\
T,1,1-408-111-0222,b,hi,79228162514264337593543950335
T,2,1-408-111-0222,b,hi,79228162514264337593543950335
"[..],
            &mut accounts,
        )
        .unwrap();
        let mut carrier = Carrier::new(accounts, "Palo Alto");
        let out = session(&mut carrier, "3\n1-408-111-0222\n1\n4\n");
        assert!(out.contains("Total charges for account 1-408-111-0222 are too large to add up"));
        assert_eq!(ids(&carrier), ["1-408-111-0222"]);
        assert_eq!(out.matches("FOOTHILL WIRELESS").count(), 3);
    }

    #[test]
    fn test_unknown_location() {
        let mut carrier = Carrier::new(Accounts::new(), "");
        let out = session(&mut carrier, "4\n");
        assert!(out.contains("FOOTHILL WIRELESS at Location not specified"));
    }
}
