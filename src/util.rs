/*!

  Utils for breadboard development.

*/

/// Compare circuit save text as strings up to indentation.
#[macro_export]
macro_rules! assert_save_eq {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                for (left_line, right_line) in left_val.lines().zip(right_val.lines()) {
                    assert_eq!(
                        left_line.trim(),
                        right_line.trim()
                    );
                }
                assert_eq!(left_val.lines().count(), right_val.lines().count());
            }
        }
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                for (left_line, right_line) in left_val.lines().zip(right_val.lines()) {
                    assert_eq!(
                        left_line.trim(),
                        right_line.trim(),
                        std::format_args!($($arg)+)
                    );
                }
                assert_eq!(left_val.lines().count(), right_val.lines().count());
            }
        }
    };
}
