use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::ordering::order_cat_images;
use crate::entity::{
    blood_type, cat, cat_blood_type, cat_color, cat_litter, cat_variety, color, genetic_test,
    image, litter, medical_test, variety,
};
use crate::models::cat::{CatDetails, ImageResponse, MedicalTestResponse};
use crate::models::litter::LitterDetails;

/// `test_type` of the genetic test that carries a cat's color genetics.
pub const COLOR_TEST_TYPE: &str = "color";
/// `test_name` of the genetic test that carries a cat's color genetics.
pub const COLOR_GENETICS_TEST_NAME: &str = "Color Genetics";

/// Rows related to a set of cats, each filtered by `cat_id IN (ids)`.
#[derive(Debug, Default)]
pub(super) struct CatRelations {
    pub images: Vec<image::Model>,
    pub colors: Vec<cat_color::Model>,
    pub varieties: Vec<cat_variety::Model>,
    pub blood_types: Vec<cat_blood_type::Model>,
    pub genetic_tests: Vec<genetic_test::Model>,
    pub medical_tests: Vec<medical_test::Model>,
}

impl CatRelations {
    /// Lookup-table IDs referenced by the junction rows:
    /// `(color ids, variety ids, blood type ids)`.
    pub fn lookup_ids(&self) -> (Vec<Uuid>, Vec<Uuid>, Vec<Uuid>) {
        (
            dedup(self.colors.iter().map(|r| r.color_id)),
            dedup(self.varieties.iter().map(|r| r.variety_id)),
            dedup(self.blood_types.iter().map(|r| r.blood_type_id)),
        )
    }
}

/// Lookup rows keyed by ID.
#[derive(Debug, Default)]
pub(super) struct Lookups {
    colors: HashMap<Uuid, color::Model>,
    varieties: HashMap<Uuid, variety::Model>,
    blood_types: HashMap<Uuid, blood_type::Model>,
}

impl Lookups {
    pub fn new(
        colors: Vec<color::Model>,
        varieties: Vec<variety::Model>,
        blood_types: Vec<blood_type::Model>,
    ) -> Self {
        Self {
            colors: colors.into_iter().map(|c| (c.id, c)).collect(),
            varieties: varieties.into_iter().map(|v| (v.id, v)).collect(),
            blood_types: blood_types.into_iter().map(|b| (b.id, b)).collect(),
        }
    }
}

/// Output of [`join_cats`].
#[derive(Debug)]
pub(super) struct JoinedCats {
    pub cats: Vec<CatDetails>,
    /// `display_order` values assigned to images that had none.
    pub order_assignments: Vec<(Uuid, i32)>,
}

fn dedup(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

fn group_by_cat<T>(rows: Vec<T>, cat_id: impl Fn(&T) -> Option<Uuid>) -> HashMap<Uuid, Vec<T>> {
    let mut groups: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        if let Some(id) = cat_id(&row) {
            groups.entry(id).or_default().push(row);
        }
    }
    groups
}

/// Join cat rows with their relations. Preserves the order of `cats`.
pub(super) fn join_cats(
    cats: Vec<cat::Model>,
    relations: CatRelations,
    lookups: &Lookups,
) -> JoinedCats {
    let mut images = group_by_cat(relations.images, |i| i.cat_id);
    let mut medical = group_by_cat(relations.medical_tests, |t| Some(t.cat_id));

    let phenotype_colors: HashMap<Uuid, Uuid> = relations
        .colors
        .iter()
        .rev()
        .filter(|r| r.is_phenotype)
        .map(|r| (r.cat_id, r.color_id))
        .collect();
    let phenotype_varieties: HashMap<Uuid, Uuid> = relations
        .varieties
        .iter()
        .rev()
        .filter(|r| r.is_phenotype)
        .map(|r| (r.cat_id, r.variety_id))
        .collect();
    let blood_types: HashMap<Uuid, Uuid> = relations
        .blood_types
        .iter()
        .map(|r| (r.cat_id, r.blood_type_id))
        .collect();
    let genetic_codes: HashMap<Uuid, String> = relations
        .genetic_tests
        .into_iter()
        .rev()
        .filter(|t| t.test_type == COLOR_TEST_TYPE && t.test_name == COLOR_GENETICS_TEST_NAME)
        .map(|t| (t.cat_id, t.result))
        .collect();

    let mut order_assignments = Vec::new();
    let cats = cats
        .into_iter()
        .map(|row| {
            let id = row.id;
            let mut details = CatDetails::bare(row);

            let mut cat_images = images.remove(&id).unwrap_or_default();
            order_assignments.extend(order_cat_images(&mut cat_images));
            details.images = cat_images.into_iter().map(ImageResponse::from).collect();

            details.color = phenotype_colors
                .get(&id)
                .and_then(|color_id| lookups.colors.get(color_id))
                .cloned()
                .map(Into::into);
            details.variety = phenotype_varieties
                .get(&id)
                .and_then(|variety_id| lookups.varieties.get(variety_id))
                .cloned()
                .map(Into::into);
            details.blood_type = blood_types
                .get(&id)
                .and_then(|bt_id| lookups.blood_types.get(bt_id))
                .cloned()
                .map(Into::into);
            details.genetic_code = genetic_codes.get(&id).cloned();
            details.medical_tests = medical
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(MedicalTestResponse::from)
                .collect();

            details
        })
        .collect();

    JoinedCats {
        cats,
        order_assignments,
    }
}

/// Every cat a set of litters refers to: parents first, then kittens, deduplicated.
pub(super) fn litter_cat_ids(
    litters: &[litter::Model],
    memberships: &[cat_litter::Model],
) -> Vec<Uuid> {
    let parents = litters.iter().flat_map(|l| [l.mother_id, l.father_id]);
    let kittens = memberships.iter().map(|m| m.cat_id);
    dedup(parents.chain(kittens))
}

/// Attach parents and kittens to litters by ID. Preserves the order of
/// `litters`; kittens keep the order of `cats`.
pub(super) fn join_litters(
    litters: Vec<litter::Model>,
    memberships: &[cat_litter::Model],
    cats: Vec<CatDetails>,
) -> Vec<LitterDetails> {
    let mut kittens_of: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for m in memberships {
        kittens_of.entry(m.litter_id).or_default().insert(m.cat_id);
    }
    let by_id: HashMap<Uuid, &CatDetails> = cats.iter().map(|c| (c.id, c)).collect();

    litters
        .into_iter()
        .map(|row| {
            let mut details = LitterDetails::bare(row);
            details.mother = by_id.get(&details.mother_id).map(|c| (*c).clone());
            details.father = by_id.get(&details.father_id).map(|c| (*c).clone());
            if let Some(kitten_ids) = kittens_of.get(&details.id) {
                details.kittens = cats
                    .iter()
                    .filter(|c| kitten_ids.contains(&c.id))
                    .cloned()
                    .collect();
            }
            details
        })
        .collect()
}

/// Drop litters whose mother or father did not resolve.
pub fn retain_complete_litters(litters: &mut Vec<LitterDetails>) {
    litters.retain(LitterDetails::is_complete);
}
