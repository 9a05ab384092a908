use anyhow::{anyhow, Result};

/// Strip everything but ASCII digits, e.g. `529.982.247-25` -> `52998224725`.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Non-blank text up to `max_len` characters
pub fn validate_text(field_name: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{} cannot be empty", field_name));
    }

    if value.chars().count() > max_len {
        return Err(anyhow!("{} cannot be longer than {} characters", field_name, max_len));
    }

    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    validate_text("Name", name, 255)
}

pub fn validate_location(location: &str) -> Result<()> {
    validate_text("Location", location, 255)
}

/// CPF validation with check digits. Punctuation is ignored.
pub fn validate_cpf(cpf: &str) -> Result<()> {
    let digits: Vec<u32> = digits_only(cpf).chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return Err(anyhow!("CPF must have 11 digits"));
    }

    if digits.iter().all(|d| *d == digits[0]) {
        return Err(anyhow!("CPF cannot have all digits equal"));
    }

    let check_digit = |len: usize| -> u32 {
        let weight_start = len as u32 + 1;
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (weight_start - i as u32))
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            rest => rest,
        }
    };

    if check_digit(9) != digits[9] || check_digit(10) != digits[10] {
        return Err(anyhow!("Invalid CPF check digits"));
    }

    Ok(())
}

/// National phone number: area code plus 8 or 9 digit subscriber number.
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(anyhow!("Phone must contain only digits"));
    }

    let digits = digits_only(phone);
    if digits.len() < 10 || digits.len() > 11 {
        return Err(anyhow!("Phone must have 10 or 11 digits including area code"));
    }

    Ok(())
}
