// Character based, so accented street names count like the user sees them
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len < min {
        if min == 1 {
            return Err(format!("{} must not be empty", field));
        }
        return Err(format!("{} must be at least {} characters", field, min));
    }
    if len > max {
        return Err(format!("{} must be at most {} characters", field, max));
    }
    Ok(())
}

pub fn check_optional_length(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value {
        Some(v) => check_length(field, v, 0, max),
        None => Ok(())
    }
}
