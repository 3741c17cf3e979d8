//! Random password generation from OS entropy.

use zeroize::Zeroizing;

use crate::crypto::secure_random;
use crate::error::VaultError;
use crate::strength::SYMBOLS;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

pub const MIN_GENERATED_LENGTH: usize = 8;
pub const DEFAULT_GENERATED_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_GENERATED_LENGTH,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, set)| set.as_bytes())
        .collect()
    }
}

/// Generate a password containing at least one character of every
/// enabled class.
pub fn generate_password(opts: &GeneratorOptions) -> Result<Zeroizing<String>, VaultError> {
    let classes = opts.classes();
    if classes.is_empty() {
        return Err(VaultError::malformed(
            "at least one character class must be enabled",
        ));
    }
    if opts.length < MIN_GENERATED_LENGTH.max(classes.len()) {
        return Err(VaultError::malformed(format!(
            "generated passwords must be at least {MIN_GENERATED_LENGTH} characters"
        )));
    }

    let alphabet: Vec<u8> = classes.iter().flat_map(|set| set.iter().copied()).collect();

    let mut chars = Zeroizing::new(Vec::with_capacity(opts.length));
    for set in &classes {
        chars.push(set[random_index(set.len())?]);
    }
    while chars.len() < opts.length {
        chars.push(alphabet[random_index(alphabet.len())?]);
    }

    // Fisher-Yates, so the guaranteed characters are not always up front.
    for i in (1..chars.len()).rev() {
        let j = random_index(i + 1)?;
        chars.swap(i, j);
    }

    let mut out = Zeroizing::new(String::with_capacity(opts.length));
    out.extend(chars.iter().map(|&b| b as char));
    Ok(out)
}

/// Uniform index in `0..bound`, using rejection sampling to avoid modulo bias.
fn random_index(bound: usize) -> Result<usize, VaultError> {
    let bound = bound as u32;
    let zone = u32::MAX - (u32::MAX % bound);
    loop {
        let mut buf = [0u8; 4];
        secure_random(&mut buf)?;
        let v = u32::from_le_bytes(buf);
        if v < zone {
            return Ok((v % bound) as usize);
        }
    }
}
