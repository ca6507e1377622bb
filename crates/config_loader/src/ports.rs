//! Port specification parsing
//!
//! Accepted forms:
//! - inclusive range `start-end` (descending allowed)
//! - comma-separated list `5030,5031,5040`
//!
//! Every port must lie in [1, 65535].

use contracts::ContractError;

const MIN_PORT: i64 = 1;
const MAX_PORT: i64 = 65535;

/// Parse a port specification into an ordered port list.
///
/// # Errors
/// [`ContractError::InvalidPortSpec`] echoing `input` on any malformed
/// entry or out-of-range port.
pub fn parse_ports(input: &str) -> Result<Vec<u16>, ContractError> {
    let spec = input.trim();
    if spec.is_empty() {
        return Err(ContractError::invalid_port_spec(
            input,
            "ports string cannot be empty",
        ));
    }

    if spec.contains('-') && !spec.contains(',') {
        parse_range(input, spec)
    } else {
        parse_list(input, spec)
    }
}

fn parse_range(input: &str, spec: &str) -> Result<Vec<u16>, ContractError> {
    let parts: Vec<&str> = spec.split('-').collect();
    let [start, end] = parts.as_slice() else {
        return Err(ContractError::invalid_port_spec(
            input,
            "range must be start-end",
        ));
    };

    let start = check_range(input, parse_number(input, start, "start port")?)?;
    let end = check_range(input, parse_number(input, end, "end port")?)?;

    let ports = if start <= end {
        (start..=end).collect()
    } else {
        (end..=start).rev().collect()
    };
    Ok(ports)
}

fn parse_list(input: &str, spec: &str) -> Result<Vec<u16>, ContractError> {
    spec.split(',')
        .map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(ContractError::invalid_port_spec(
                    input,
                    "empty port entry in list",
                ));
            }
            let port = parse_number(input, entry, "port")?;
            check_range(input, port)
        })
        .collect()
}

fn parse_number(input: &str, raw: &str, what: &str) -> Result<i64, ContractError> {
    let raw = raw.trim();
    raw.parse::<i64>().map_err(|e| {
        ContractError::invalid_port_spec(input, format!("invalid {what} {raw:?}: {e}"))
    })
}

fn check_range(input: &str, port: i64) -> Result<u16, ContractError> {
    if !(MIN_PORT..=MAX_PORT).contains(&port) {
        return Err(ContractError::invalid_port_spec(
            input,
            format!("port {port} out of range"),
        ));
    }
    // Range-checked above
    Ok(port as u16)
}
