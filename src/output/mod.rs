pub mod formatter;

pub use formatter::{
    format_age, format_pr_detail, format_pr_details, format_pr_table, format_tsv,
    should_use_colors,
};
