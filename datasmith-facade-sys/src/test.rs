#[cfg(test)]
mod tests {
    use crate::{FDatasmithFacadeElementHandle, FDatasmithFacadeLogStream, FDatasmithFacadeVector};

    #[test]
    fn test_vector_layout() {
        // Three packed f32 components, as a C `struct { float x, y, z; }`.
        assert_eq!(std::mem::size_of::<FDatasmithFacadeVector>(), 12);
        assert_eq!(std::mem::align_of::<FDatasmithFacadeVector>(), 4);
    }

    #[test]
    fn test_log_stream_layout() {
        assert_eq!(
            std::mem::size_of::<FDatasmithFacadeLogStream>(),
            2 * std::mem::size_of::<*const ()>()
        );
    }

    #[test]
    fn test_element_handle_layout() {
        // An address followed by a 64-bit id, passed by value.
        assert!(
            std::mem::size_of::<FDatasmithFacadeElementHandle>()
                >= std::mem::size_of::<usize>() + std::mem::size_of::<u64>()
        );
        assert_eq!(std::mem::offset_of!(FDatasmithFacadeElementHandle, element), 0);
    }

    #[test]
    fn test_version() {
        assert_eq!(crate::FDatasmithFacade_GetVersionMajor(), 1);
        assert!(!crate::CRATE_VERSION.is_empty());
    }
}
