use std::any::Any;

/// Upcasts to [`Any`] from any trait object whose trait extends [`AsAny`].
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Recovers the concrete type of a boxed trait object.
pub trait Downcast: Sized {
    type Output<T>;

    fn downcast<T: Any>(self) -> Result<Self::Output<T>, Self>;
}

impl<S> Downcast for Box<S>
where
    S: AsAny + ?Sized,
{
    type Output<T> = Box<T>;

    fn downcast<T: Any>(self) -> Result<Self::Output<T>, Self> {
        if !(*self).as_any().is::<T>() {
            return Err(self);
        }
        let object = self
            .into_any()
            .downcast::<T>()
            .unwrap_or_else(|_| unreachable!("the boxed value was checked to be a `T`"));
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape: AsAny + Send + Sync {}

    impl Shape for u32 {}

    impl Shape for String {}

    #[test]
    fn downcast_succeeds() {
        let shape: Box<dyn Shape> = Box::new(7u32);

        assert!((*shape).as_any().is::<u32>());
        let value = shape.downcast::<u32>().unwrap_or_else(|_| Box::new(0));
        assert_eq!(*value, 7);
    }

    #[test]
    fn downcast_fails_when_type_differs() {
        let shape: Box<dyn Shape> = Box::new(String::from("seven"));

        let shape = match shape.downcast::<u32>() {
            Ok(_) => panic!("a `String` is not a `u32`"),
            Err(shape) => shape,
        };
        let text = shape.downcast::<String>().unwrap_or_else(|_| unreachable!());
        assert_eq!(text.as_str(), "seven");
    }
}
