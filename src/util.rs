/// Checks that a numerical value is in the provided interval `[a,b]` and returns early
/// with a [`Config`](crate::Error::Config) error naming the value if not
///
/// ### Example
/// ```ignore
/// let epsilon = 2.0;
/// ensure_interval!(epsilon, 0.0, 1.0);
/// ```
/// This returns the error "Invalid value for \`epsilon\`: must be in the interval \[0, 1\], got 2".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::Config {
                field: stringify!($var),
                reason: format!(
                    "must be in the interval [{}, {}], got {}",
                    $a, $b, $var
                ),
            });
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Error, Result};

    fn check(alpha: f64) -> Result<()> {
        ensure_interval!(alpha, 0.0, 1.0);
        Ok(())
    }

    #[test]
    fn ensure_interval_functional() {
        assert!(check(0.0).is_ok(), "lower bound is inclusive");
        assert!(check(1.0).is_ok(), "upper bound is inclusive");
        assert!(check(f64::NAN).is_err(), "NaN is rejected");
        match check(1.5) {
            Err(Error::Config { field, .. }) => assert_eq!(field, "alpha"),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
