use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "CREDVAULT_PASSWORD";

/// `true` when the master password will be typed at a terminal, so a wrong
/// guess can be retried.
pub fn is_interactive() -> bool {
    std::env::var(PASSWORD_ENV).map_or(true, |pw| pw.is_empty()) && io::stdin().is_terminal()
}

/// Master password from, in order: `CREDVAULT_PASSWORD`, the first line of
/// piped stdin, or a TTY prompt.
pub fn read_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    if !io::stdin().is_terminal() {
        let pw = read_line()?;
        if !pw.is_empty() {
            return Ok(pw);
        }
    } else {
        let pw = Zeroizing::new(rpassword::prompt_password("Master password: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No password provided")
}

/// A new master password: taken from `CREDVAULT_PASSWORD` if set, otherwise
/// entered twice and confirmed.
pub fn read_new_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }
    read_secret_with_confirmation("New master password: ", "Confirm master password: ")
}

/// A secret value. Piped stdin supplies one line; a terminal is prompted
/// twice and both entries must match.
pub fn read_secret_with_confirmation(prompt: &str, confirm: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let pw = read_line()?;
        if pw.is_empty() {
            bail!("password cannot be empty");
        }
        return Ok(pw);
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password(prompt)?);
    let pw2 = Zeroizing::new(rpassword::prompt_password(confirm)?);

    if pw1.is_empty() {
        bail!("password cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

/// A secret value typed once, for analysis only.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return read_line();
    }
    Ok(Zeroizing::new(rpassword::prompt_password(prompt)?))
}

fn read_line() -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut buf)?;
    trim_newline(&mut buf);
    Ok(buf)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
