//! Validation utilities for the Microgreen Grower Portal

/// Validate a tray count supplied at batch creation (must be non-negative)
pub fn validate_tray_count(count: i64) -> Result<(), &'static str> {
    if count < 0 {
        return Err("Tray count cannot be negative");
    }
    Ok(())
}

/// Validate an order line quantity (must be strictly positive)
pub fn validate_order_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a variety name
pub fn validate_variety_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Variety name cannot be empty");
    }
    Ok(())
}

/// Validate a harvest quality score (1-10 scale)
pub fn validate_quality_score(score: i32) -> Result<(), &'static str> {
    if !(1..=10).contains(&score) {
        return Err("Quality score must be between 1 and 10");
    }
    Ok(())
}

/// Validate a forecast horizon in weeks
pub fn validate_horizon_weeks(weeks: i64) -> Result<(), &'static str> {
    if weeks < 1 {
        return Err("Forecast horizon must be at least one week");
    }
    if weeks > 52 {
        return Err("Forecast horizon cannot exceed 52 weeks");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}
