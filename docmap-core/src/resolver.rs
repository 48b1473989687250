//! Collection name resolution from entity types.

use std::any::type_name;

/// Returns the simple name of `T`: its path and generic arguments stripped.
///
/// This is the collection an entity is stored in when a caller does not name one.
///
/// ```ignore
/// mod model { pub struct Test; }
/// assert_eq!(default_collection_name::<model::Test>(), "Test");
/// ```
pub fn default_collection_name<T: ?Sized>() -> &'static str {
    simple_name(type_name::<T>())
}

fn simple_name(full: &'static str) -> &'static str {
    let base = match full.find('<') {
        Some(pos) => &full[..pos],
        None => full,
    };

    match base.rfind("::") {
        Some(pos) => &base[pos + 2..],
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod model {
        pub struct Test;
        pub struct Wrapper<T>(pub T);
    }

    #[test]
    fn strips_module_path() {
        assert_eq!(default_collection_name::<model::Test>(), "Test");
    }

    #[test]
    fn strips_generic_arguments() {
        assert_eq!(default_collection_name::<model::Wrapper<model::Test>>(), "Wrapper");
    }

    #[test]
    fn keeps_bare_names() {
        assert_eq!(simple_name("Test"), "Test");
        assert_eq!(default_collection_name::<u32>(), "u32");
    }
}
