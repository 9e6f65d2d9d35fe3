use crate::{
    naming,
    node::{ArgMode, InstructorDescriptor},
};
use std::collections::BTreeMap;

///
/// HandlerIndex
///
/// Field-keyed handlers of one instructor, indexed by canonical leaf name.
/// Within each slot the first handler in method declaration order wins.
///

#[derive(Debug, Default)]
pub(crate) struct HandlerIndex<'a> {
    no_arg: BTreeMap<String, &'a str>,
    legacy_bool: BTreeMap<String, &'a str>,
    multi: BTreeMap<String, &'a str>,
}

impl<'a> HandlerIndex<'a> {
    pub(crate) fn new(instructor: &'a InstructorDescriptor) -> Self {
        let mut index = Self::default();

        for (handler, target, mode) in instructor.single_field() {
            let slot = match mode {
                ArgMode::NoArg => &mut index.no_arg,
                ArgMode::LegacyBoolArg => &mut index.legacy_bool,
            };
            slot.entry(naming::pascal(target)).or_insert(handler);
        }

        for (handler, targets) in instructor.multi_field() {
            for target in targets {
                index.multi.entry(naming::pascal(target)).or_insert(handler);
            }
        }

        index
    }

    pub(crate) fn no_arg(&self, leaf_name: &str) -> Option<&'a str> {
        self.no_arg.get(leaf_name).copied()
    }

    pub(crate) fn legacy_bool(&self, leaf_name: &str) -> Option<&'a str> {
        self.legacy_bool.get(leaf_name).copied()
    }

    pub(crate) fn multi(&self, leaf_name: &str) -> Option<&'a str> {
        self.multi.get(leaf_name).copied()
    }
}
