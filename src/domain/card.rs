use crate::error::{Field, ValidationError};
use serde::{Deserialize, Serialize};

/// Raw card fields as received from the caller, before any checks.
#[derive(Debug, Clone, Deserialize)]
pub struct CardCredentials {
    pub cc: String,
    pub mm: String,
    pub yy: String,
    pub cvv: String,
}

impl CardCredentials {
    pub fn new(
        cc: impl Into<String>,
        mm: impl Into<String>,
        yy: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            cc: cc.into(),
            mm: mm.into(),
            yy: yy.into(),
            cvv: cvv.into(),
        }
    }

    /// Parses the `cc|mm|yy|cvv` line format.
    pub fn from_pipe_line(line: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = line.trim().split('|').map(str::trim).collect();
        match parts.as_slice() {
            [cc, mm, yy, cvv] => Ok(Self::new(*cc, *mm, *yy, *cvv)),
            _ => Err(ValidationError::new(
                Field::Number,
                "expected four fields separated by '|'",
            )),
        }
    }
}

/// Credentials that passed [`validate`]. The year is always two digits.
///
/// Fields are private so the only way to obtain one is through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCredentials {
    number: String,
    month: u8,
    year: String,
    cvv: String,
}

impl NormalizedCredentials {
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Two-digit expiry year.
    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    pub fn prefix(&self) -> &str {
        &self.number[..6]
    }

    /// `MM/YY`
    pub fn expiry(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }

    pub fn digest(&self) -> CardDigest {
        CardDigest::of(&self.number)
    }
}

fn all_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Checks the four card fields in order; the first failing rule is reported.
pub fn validate(credentials: &CardCredentials) -> Result<NormalizedCredentials, ValidationError> {
    let number = credentials.cc.trim();
    if !all_digits(number, 13, 19) {
        return Err(ValidationError::new(Field::Number, "must be 13 to 19 digits"));
    }

    let month = credentials.mm.trim();
    if !all_digits(month, 1, 2) {
        return Err(ValidationError::new(Field::Month, "must be 1 or 2 digits"));
    }
    let month: u8 = month
        .parse()
        .map_err(|_| ValidationError::new(Field::Month, "must be numeric"))?;
    if !(1..=12).contains(&month) {
        return Err(ValidationError::new(Field::Month, "must be between 1 and 12"));
    }

    let year = credentials.yy.trim();
    if !all_digits(year, 2, 4) {
        return Err(ValidationError::new(Field::Year, "must be 2 to 4 digits"));
    }
    let year = year[year.len() - 2..].to_string();

    let cvv = credentials.cvv.trim();
    if !all_digits(cvv, 3, 4) {
        return Err(ValidationError::new(Field::Cvv, "must be 3 or 4 digits"));
    }

    Ok(NormalizedCredentials {
        number: number.to_string(),
        month,
        year,
        cvv: cvv.to_string(),
    })
}

/// Validates a bare six-digit issuer prefix.
pub fn validate_prefix(prefix: &str) -> Result<&str, ValidationError> {
    let prefix = prefix.trim();
    if all_digits(prefix, 6, 6) {
        Ok(prefix)
    } else {
        Err(ValidationError::new(Field::Prefix, "must be exactly 6 digits"))
    }
}

/// The only part of a card number that outlives a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardDigest {
    pub first6: String,
    pub last4: String,
}

impl CardDigest {
    /// Keeps the first six and last four characters. Inputs too short to
    /// mask safely yield an empty digest.
    pub fn of(number: &str) -> Self {
        let number = number.trim();
        if number.len() < 13 || !number.is_ascii() {
            return Self::default();
        }
        Self {
            first6: number[..6].to_string(),
            last4: number[number.len() - 4..].to_string(),
        }
    }
}
