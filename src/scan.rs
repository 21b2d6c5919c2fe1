use anyhow::Context;
use regex::Regex;
use std::fs;
use std::path::Path;

/// A numbered group of related audio clips, one per subdirectory of the
/// root. The ordinal stays a string because it is used verbatim as the
/// prefix of each intermediate output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundClass {
    pub number: String,
    pub name: String,
}

/// Parse a class directory name of the form `"<number> <class name>"`.
pub fn parse_class_dir_name(dir_name: &str) -> anyhow::Result<SoundClass> {
    let re = Regex::new(r"^(\d+) (.+)$").unwrap();
    let caps = re.captures(dir_name).ok_or_else(|| {
        anyhow::anyhow!(
            "Directory name '{}' does not match '<number> <class name>'",
            dir_name
        )
    })?;
    Ok(SoundClass {
        number: caps[1].to_string(),
        name: caps[2].to_string(),
    })
}

/// List the `.wav` file names of a class directory, sorted so the order
/// is stable across filesystems and matches the transcript line order.
pub fn list_wav_files(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.ends_with(".wav") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Load `transcript.txt` from a class directory, one caption per line
/// with trailing whitespace stripped. `None` when the file is absent.
pub fn load_transcript(dir: &Path) -> anyhow::Result<Option<Vec<String>>> {
    let path = dir.join("transcript.txt");
    if !path.exists() {
        return Ok(None);
    }
    let data =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(data.lines().map(|l| l.trim_end().to_string()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn class_name_keeps_embedded_spaces() {
        let class = parse_class_dir_name("12 Dog Barks").unwrap();
        assert_eq!(class.number, "12");
        assert_eq!(class.name, "Dog Barks");
    }

    #[test]
    fn names_without_a_numeric_prefix_are_rejected() {
        assert!(parse_class_dir_name("Dogs").is_err());
        assert!(parse_class_dir_name("12Dogs").is_err());
        assert!(parse_class_dir_name("").is_err());
    }

    #[test]
    fn wav_listing_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["b.wav", "a.wav", "transcript.txt", "notes.md"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let wavs = list_wav_files(dir.path()).unwrap();
        assert_eq!(wavs, vec!["a.wav".to_string(), "b.wav".to_string()]);
    }

    #[test]
    fn transcript_lines_lose_trailing_whitespace() {
        let dir = tempdir().unwrap();
        let mut f = File::create(dir.path().join("transcript.txt")).unwrap();
        writeln!(f, "A dog barking ").unwrap();
        writeln!(f, "A cat meowing").unwrap();
        let captions = load_transcript(dir.path()).unwrap().unwrap();
        assert_eq!(captions, vec!["A dog barking", "A cat meowing"]);
    }

    #[test]
    fn missing_transcript_is_not_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_transcript(dir.path()).unwrap().is_none());
    }
}
