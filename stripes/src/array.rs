/// Defines a strongly typed array wrapper.
#[macro_export]
macro_rules! array_wrapper {
    ($name:ident, $t:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(::ndarray::Array1<$t>);

        impl From<::ndarray::Array1<$t>> for $name {
            fn from(array: ::ndarray::Array1<$t>) -> Self {
                Self(array)
            }
        }

        impl From<Vec<$t>> for $name {
            fn from(vec: Vec<$t>) -> Self {
                Self(::ndarray::Array1::from(vec))
            }
        }

        impl ::std::iter::FromIterator<$t> for $name {
            fn from_iter<T>(iter: T) -> Self
            where
                T: IntoIterator<Item = $t>,
            {
                Self(iter.into_iter().collect())
            }
        }

        impl ::std::ops::Index<usize> for $name {
            type Output = $t;
            fn index(&self, index: usize) -> &$t {
                &self.0[index]
            }
        }

        impl ::std::ops::IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut $t {
                &mut self.0[index]
            }
        }

        impl $name {
            /// Vector length.
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Whether the vector has no elements.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Iterates the vector.
            pub fn iter(&self) -> impl Iterator<Item = &$t> {
                self.0.iter()
            }

            /// Returns the underlying vector.
            #[must_use]
            pub fn vec(&self) -> &::ndarray::Array1<$t> {
                &self.0
            }

            /// Returns the underlying vector.
            pub fn vec_mut(&mut self) -> &mut ::ndarray::Array1<$t> {
                &mut self.0
            }

            /// Copies the elements into a plain `Vec`.
            #[must_use]
            pub fn to_vec(&self) -> Vec<$t> {
                self.0.to_vec()
            }
        }
    };
}
