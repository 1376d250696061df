#![allow(dead_code, unused_imports)]

pub(crate) mod fake_svn;
pub(crate) mod test_context;

pub(crate) use fake_svn::FakeSvn;
pub(crate) use test_context::{REPOSITORY, TestContext};
