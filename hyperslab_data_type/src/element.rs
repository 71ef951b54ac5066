use crate::ElementType;

/// A trait representing a host scalar that can be held in a [`Buffer`](crate::Buffer).
pub trait Element: bytemuck::Pod + num::NumCast + Send + Sync + 'static {
    /// The element type of a buffer built from this scalar.
    const ELEMENT_TYPE: ElementType;

    /// Returns true if this scalar can be read out of a buffer of `element_type`.
    fn is_compatible(element_type: ElementType) -> bool;
}

/// Helper macro to implement `Element` for POD (plain old data) types.
macro_rules! impl_element_pod {
    ($raw_type:ty, $element_type:ident $(, $compatible:ident)* $(,)?) => {
        impl Element for $raw_type {
            const ELEMENT_TYPE: ElementType = ElementType::$element_type;

            fn is_compatible(element_type: ElementType) -> bool {
                element_type == ElementType::$element_type
                    $( || element_type == ElementType::$compatible )*
            }
        }
    };
}

impl_element_pod!(i8, Int8, Char);
impl_element_pod!(u8, UInt8, Char);
impl_element_pod!(i16, Int16);
impl_element_pod!(i32, Int32);
impl_element_pod!(f32, Float32);
impl_element_pod!(f64, Float64);
