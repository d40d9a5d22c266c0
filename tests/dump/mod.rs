mod dump_branches_and_tags;
mod dump_fails_on_binary_blob;
mod dump_fails_outside_repository;
mod dump_orders_parents_before_children;
mod dump_readded_blob_after_evil_merge;
mod dump_rejects_invalid_since;
mod dump_rename_without_content_change;
mod dump_since_filter;
mod dump_single_root_commit;
mod dump_type_change_splits_into_remove_and_create;
