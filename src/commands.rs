pub(crate) mod fix_archive;
