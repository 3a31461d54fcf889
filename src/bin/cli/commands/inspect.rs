//! Single-patch inspection command.

use patchsplit_rs::PatchFeatureExtractor;

use crate::cli::args::InspectPatchArgs;
use crate::cli::output::display_patch_features;

/// Print the features extracted from one patch file
pub fn inspect_patch_command(args: InspectPatchArgs) -> anyhow::Result<()> {
    if !args.patch.is_file() {
        anyhow::bail!("Patch file not found: {}", args.patch.display());
    }

    let extractor = PatchFeatureExtractor::new(args.source_extension);
    let features = extractor.extract_file(&args.patch);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&features)?);
    } else {
        display_patch_features(&features);
    }
    Ok(())
}
