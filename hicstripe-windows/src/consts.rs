/// File name tag of windows scanned in horizontal orientation.
pub const HORIZONTAL_TAG: &str = "_Horzntl";
/// File name tag of windows scanned in vertical orientation.
pub const VERTICAL_TAG: &str = "_Vertcl";

pub const MATRIX_SUFFIX: &str = "_matrix";
pub const LABEL_EXT: &str = ".label";
pub const INTENSITY_LABEL_EXT: &str = ".label.exp";

pub const POSITIVE_DIR_PREFIX: &str = "positive_";
pub const NEGATIVE_DIR_PREFIX: &str = "negative_";

pub const POSITIVE_INDEX_PREFIX: &str = "pos_file_names_";
pub const NEGATIVE_INDEX_PREFIX: &str = "neg_file_names_";
pub const POSITIVE_LABEL_INDEX_PREFIX: &str = "pos_label_file_names_";
pub const INDEX_EXT: &str = ".txt";

/// Separator between the cells of one row of a persisted grid.
pub const CELL_SEPARATOR: &str = " ";
