use std::fmt::Debug;

use regex::Regex;

pub fn assert_re(pattern: &str, haystack: &str) {
    let re = Regex::new(pattern).unwrap();
    assert!(re.is_match(haystack), "{:?} did not match {:?}", haystack, re);
}

/// Like assert_eq on two Vecs, but on failure prints each element on its own
/// line, and which indexes differ.
pub fn assert_vec_eq<T: PartialEq + Debug>(left: Vec<T>, right: Vec<T>) {
    if left == right {
        return;
    }
    eprintln!("left:");
    for o in &left {
        eprintln!("  {:?}", o);
    }
    eprintln!("right:");
    for o in &right {
        eprintln!("  {:?}", o);
    }
    for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        if l != r {
            eprintln!("Mismatch at index {}: {:#?} != {:#?}", i, l, r);
        }
    }
    panic!("left (len {}) != right (len {})", left.len(), right.len());
}
