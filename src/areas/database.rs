use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Cursor, Read};
use std::path::Path;

/// Object store under `.git/objects`
///
/// Loose objects are inflated straight from their files. Anything else
/// (packfiles, alternates) is looked up through libgit2's object database.
pub struct Database {
    path: Box<Path>,
    packed: git2::Odb<'static>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Database {
    pub fn new(path: Box<Path>) -> anyhow::Result<Self> {
        let objects_dir = path
            .to_str()
            .with_context(|| format!("Object directory {} is not UTF-8", path.display()))?;

        let packed = git2::Odb::new().context("Unable to open the packed object database")?;
        packed
            .add_disk_alternate(objects_dir)
            .with_context(|| format!("Unable to read packs under {objects_dir}"))?;

        Ok(Database { path, packed })
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Compare two trees (`None` is the empty tree), old on the left.
    pub fn tree_diff(
        &self,
        old_oid: Option<&ObjectId>,
        new_oid: Option<&ObjectId>,
    ) -> anyhow::Result<TreeDiff<'_>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_oids(old_oid, new_oid, "")?;
        Ok(tree_diff)
    }

    #[cfg(test)]
    pub fn store(
        &self,
        object: &impl crate::artifacts::objects::object::Object,
    ) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());
        let object_content = object.serialize()?;

        // write the object to disk unless it already exists
        // otherwise, create the object directory
        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object_content)?;
        }

        Ok(object_id)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        self.parse_object_as_blob(object_id)?
            .with_context(|| format!("Object {object_id} is not a blob"))
    }

    pub fn load_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        self.parse_object_as_tree(object_id)?
            .with_context(|| format!("Object {object_id} is not a tree"))
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .with_context(|| format!("Object {object_id} is not a commit"))
    }

    pub fn load_slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.load_commit(object_id)?.to_slim(object_id.clone()))
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.read_object(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .with_context(|| format!("Corrupt object header in {object_id}"))?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        match std::fs::read(&object_path) {
            Ok(object_content) => Self::decompress(object_content.into()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                self.read_packed_object(object_id)
            }
            Err(error) => Err(error).context(format!(
                "Unable to read object file {}",
                object_path.display()
            )),
        }
    }

    /// Read an object that has no loose file, returned with its loose header.
    fn read_packed_object(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let oid = git2::Oid::from_str(object_id.as_ref())?;
        let object = self
            .packed
            .read(oid)
            .with_context(|| format!("Object {object_id} not found in {}", self.path.display()))?;

        let object_type = match object.kind() {
            git2::ObjectType::Blob => ObjectType::Blob,
            git2::ObjectType::Tree => ObjectType::Tree,
            git2::ObjectType::Commit => ObjectType::Commit,
            other => anyhow::bail!("Unsupported object type {other:?} for {object_id}"),
        };

        Ok(with_header(object_type, object.data()))
    }

    #[cfg(test)]
    fn write_object(
        &self,
        object_path: std::path::PathBuf,
        object_content: Bytes,
    ) -> anyhow::Result<()> {
        use std::io::Write;

        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    #[cfg(test)]
    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        use std::io::Write;

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    #[cfg(test)]
    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", fake::rand::random::<u32>())
    }
}
