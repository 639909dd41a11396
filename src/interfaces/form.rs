use crate::domain::order::OrderForm;
use std::collections::HashMap;

/// Collects checkout fields from submitted `name=value` pairs.
///
/// Absent fields become empty strings so that validation reports them as
/// missing. When a name repeats, the last value wins, as with a browser form.
pub fn form_from_pairs<'a, I>(pairs: I) -> OrderForm
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let fields: HashMap<&str, &str> = pairs.into_iter().collect();
    let field = |name: &str| fields.get(name).map(|v| v.to_string()).unwrap_or_default();

    OrderForm {
        fname: field("fname"),
        email: field("email"),
        phone: field("phone"),
        address: field("address"),
        total: field("total"),
        payment_method: field("payment_method"),
    }
}

/// Splits `name=value` arguments, ignoring any without an `=`.
pub fn parse_assignments(args: &[String]) -> Vec<(&str, &str)> {
    args.iter().filter_map(|arg| arg.split_once('=')).collect()
}
