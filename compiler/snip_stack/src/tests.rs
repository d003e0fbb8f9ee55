use super::*;

fn nesting_depth(n: u32) -> u32 {
    ensure_sufficient_stack(|| if n == 0 { 0 } else { nesting_depth(n - 1) + 1 })
}

#[test]
fn passes_result_through() {
    assert_eq!(ensure_sufficient_stack(|| "done"), "done");
}

#[test]
fn survives_deep_recursion() {
    assert_eq!(nesting_depth(200_000), 200_000);
}
