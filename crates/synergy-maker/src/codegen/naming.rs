//! Identifier case helpers.

/// `SalesInvoice` -> `sales-invoice`.
pub fn to_kebab_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// First character lowercased.
pub fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// First character uppercased.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("SalesInvoice"), "sales-invoice");
        assert_eq!(to_kebab_case("customer"), "customer");
        assert_eq!(to_kebab_case(""), "");
    }

    #[test]
    fn test_first_letter() {
        assert_eq!(lcfirst("Customer"), "customer");
        assert_eq!(ucfirst("customer"), "Customer");
        assert_eq!(ucfirst(""), "");
    }
}
