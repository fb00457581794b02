//! Prime helpers used to keep table capacities prime.
//!
//! Every capacity a table ever takes is prime, and double hashing derives its
//! step from the largest prime below the capacity. These are plain trial
//! division routines: capacities stay far below the range where anything
//! smarter would pay off.

/// Returns `true` if `n` is prime.
///
/// # Examples
///
/// ```rust
/// use probe_table::prime::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(11));
/// assert!(!is_prime(1));
/// assert!(!is_prime(21));
/// ```
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut divisor = 3usize;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }

    true
}

/// Returns the smallest prime strictly greater than `n`.
///
/// Values below 2 map to 2.
///
/// # Examples
///
/// ```rust
/// use probe_table::prime::next_prime;
///
/// assert_eq!(next_prime(0), 2);
/// assert_eq!(next_prime(10), 11);
/// assert_eq!(next_prime(11), 13);
/// ```
pub fn next_prime(n: usize) -> usize {
    if n < 2 {
        return 2;
    }

    // Odd candidates only.
    let mut candidate = n + 1;
    if candidate % 2 == 0 {
        candidate += 1;
    }
    while !is_prime(candidate) {
        candidate += 2;
    }

    candidate
}

/// Returns the largest prime strictly less than `n`, or `None` when `n <= 2`.
///
/// # Examples
///
/// ```rust
/// use probe_table::prime::previous_prime;
///
/// assert_eq!(previous_prime(2), None);
/// assert_eq!(previous_prime(3), Some(2));
/// assert_eq!(previous_prime(11), Some(7));
/// assert_eq!(previous_prime(12), Some(11));
/// ```
pub fn previous_prime(n: usize) -> Option<usize> {
    if n <= 2 {
        return None;
    }
    if n == 3 {
        return Some(2);
    }

    let mut candidate = n - 1;
    if candidate % 2 == 0 {
        candidate -= 1;
    }
    while !is_prime(candidate) {
        candidate -= 2;
    }

    Some(candidate)
}
