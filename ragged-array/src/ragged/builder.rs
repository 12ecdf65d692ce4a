use ragged_dtype::NativePType;
use ragged_error::{RaggedResult, ragged_err};

use crate::{Attributes, RaggedArray, RaggedOptions};

/// Assembles a [`RaggedArray`] from caller buffers, a shape guess, or both.
///
/// Buffers that are not supplied are allocated from the shape guess: `entry_count` empty entries
/// and `entry_count * avg_entry_len` elements of `fill_value` in the flat buffer.
#[derive(Debug, Clone)]
pub struct RaggedArrayBuilder<T> {
    flattened_data: Option<Vec<T>>,
    cumulative_length: Option<Vec<usize>>,
    shape_guess: Option<(usize, usize)>,
    fill_value: Option<T>,
    attrs: Attributes,
    options: RaggedOptions,
}

impl<T> Default for RaggedArrayBuilder<T> {
    fn default() -> Self {
        Self {
            flattened_data: None,
            cumulative_length: None,
            shape_guess: None,
            fill_value: None,
            attrs: Attributes::default(),
            options: RaggedOptions::default(),
        }
    }
}

impl<T: NativePType> RaggedArrayBuilder<T> {
    pub fn flattened_data(mut self, flattened_data: Vec<T>) -> Self {
        self.flattened_data = Some(flattened_data);
        self
    }

    pub fn cumulative_length(mut self, cumulative_length: Vec<usize>) -> Self {
        self.cumulative_length = Some(cumulative_length);
        self
    }

    /// The number of entries and the expected average entry length.
    pub fn shape_guess(mut self, entry_count: usize, avg_entry_len: usize) -> Self {
        self.shape_guess = Some((entry_count, avg_entry_len));
        self
    }

    /// The value written into freshly allocated flat storage. Defaults to `T::default()`.
    pub fn fill_value(mut self, fill_value: T) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    pub fn attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn options(mut self, options: RaggedOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> RaggedResult<RaggedArray<T>> {
        let cumulative_length = match self.cumulative_length {
            Some(cl) => cl,
            None => {
                let (entry_count, _) = self.shape_guess.ok_or_else(|| {
                    ragged_err!(
                        InvalidShape: "a shape guess is required when cumulative_length is not supplied"
                    )
                })?;
                vec![0; entry_count]
            }
        };

        let flattened_data = match self.flattened_data {
            Some(data) => data,
            None => {
                let (entry_count, avg_entry_len) = self.shape_guess.ok_or_else(|| {
                    ragged_err!(
                        InvalidShape: "a shape guess is required when flattened_data is not supplied"
                    )
                })?;
                let capacity = entry_count.checked_mul(avg_entry_len).ok_or_else(|| {
                    ragged_err!(
                        InvalidShape: "{} entries of average length {} overflow the flat buffer",
                        entry_count,
                        avg_entry_len
                    )
                })?;
                vec![self.fill_value.unwrap_or_default(); capacity]
            }
        };

        Ok(RaggedArray::try_new(flattened_data, cumulative_length)?
            .with_attrs(self.attrs)
            .with_options(self.options))
    }
}

#[cfg(test)]
mod tests {
    use ragged_error::RaggedError;

    use super::*;

    #[test]
    fn shape_guess_allocates_both_buffers() {
        let array = RaggedArray::<f32>::builder()
            .shape_guess(3, 5)
            .fill_value(-1.0)
            .build()
            .unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.physical_len(), 15);
        assert!(array.flattened_data().iter().all(|v| *v == -1.0));
        assert!(array.iter().all(<[f32]>::is_empty));
    }

    #[test]
    fn caller_buffers_need_no_guess() {
        let array = RaggedArray::builder()
            .flattened_data(vec![1u32, 2, 3, 0, 0])
            .cumulative_length(vec![1, 3])
            .build()
            .unwrap();
        assert_eq!(array.get(1).unwrap(), &[2, 3]);
        assert_eq!(array.physical_len(), 5);
    }

    #[test]
    fn caller_offsets_with_guessed_data() {
        let array = RaggedArray::<i8>::builder()
            .cumulative_length(vec![0, 0])
            .shape_guess(2, 4)
            .build()
            .unwrap();
        assert_eq!(array.physical_len(), 8);
    }

    #[test]
    fn missing_buffer_without_guess() {
        assert!(matches!(
            RaggedArray::<u8>::builder().build().unwrap_err(),
            RaggedError::InvalidShape(..)
        ));
        assert!(matches!(
            RaggedArray::<u8>::builder()
                .cumulative_length(vec![1])
                .build()
                .unwrap_err(),
            RaggedError::InvalidShape(..)
        ));
    }

    #[test]
    fn overflowing_guess() {
        assert!(matches!(
            RaggedArray::<u8>::builder()
                .cumulative_length(vec![])
                .shape_guess(usize::MAX, 2)
                .build()
                .unwrap_err(),
            RaggedError::InvalidShape(..)
        ));
    }

    #[test]
    fn carries_attrs_and_options() {
        let options = RaggedOptions::default().with_growth_factor(4).unwrap();
        let attrs: Attributes = [("units", "mV")].into_iter().collect();
        let array = RaggedArray::<u8>::builder()
            .shape_guess(1, 1)
            .attrs(attrs.clone())
            .options(options)
            .build()
            .unwrap();
        assert_eq!(array.attrs(), &attrs);
        assert_eq!(array.options().growth_factor(), 4);
    }
}
