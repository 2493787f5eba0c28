//! Grouped passenger statistics.
//!
//! Every function here is pure over a slice of passengers: survival by
//! class, sex and age band; fares by family size and class; and last-name
//! frequency.

use crate::models::{
    AgeBand, DemographicRow, Demographics, FamilyRow, LastNameCount, Passenger, PassengerClass,
    Sex, SurvivalCounts, UnknownAgeRow,
};
use std::collections::{BTreeMap, HashMap};

/// Running passenger/survivor tally for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    passengers: usize,
    survivors: usize,
}

impl Tally {
    fn add(&mut self, survived: bool) {
        self.passengers += 1;
        if survived {
            self.survivors += 1;
        }
    }

    fn counts(self) -> SurvivalCounts {
        SurvivalCounts::new(self.passengers, self.survivors)
    }
}

/// Survival counts and rates for every (class, sex, age band) combination.
///
/// The result always holds 24 rows, sorted by class, sex and then age band
/// in canonical order; combinations with no passengers have zero counts and
/// a zero rate. Passengers with no recorded age are tallied separately in
/// six (class, sex) rows instead of being dropped.
pub fn survival_demographics(passengers: &[Passenger]) -> Demographics {
    let mut banded: HashMap<(PassengerClass, Sex, AgeBand), Tally> = HashMap::new();
    let mut unbanded: HashMap<(PassengerClass, Sex), Tally> = HashMap::new();

    for p in passengers {
        match p.age_band() {
            Some(band) => {
                let key = (p.class, p.sex, band);
                banded.entry(key).or_default().add(p.survived);
            }
            None => {
                let key = (p.class, p.sex);
                unbanded.entry(key).or_default().add(p.survived);
            }
        }
    }

    let groups = PassengerClass::ALL.len() * Sex::ALL.len();
    let mut rows = Vec::with_capacity(groups * AgeBand::ALL.len());
    let mut unknown_age = Vec::with_capacity(groups);

    // Iterating the full domains in order yields the sorted cross-product.
    for class in PassengerClass::ALL {
        for sex in Sex::ALL {
            for age_band in AgeBand::ALL {
                let key = (class, sex, age_band);
                let tally = banded.get(&key).copied().unwrap_or_default();
                rows.push(DemographicRow {
                    class,
                    sex,
                    age_band,
                    counts: tally.counts(),
                });
            }

            let tally = unbanded.get(&(class, sex)).copied().unwrap_or_default();
            unknown_age.push(UnknownAgeRow {
                class,
                sex,
                counts: tally.counts(),
            });
        }
    }

    Demographics { rows, unknown_age }
}

/// Mean survival rate of the groups sharing each age band, in canonical order.
///
/// Each (class, sex) group counts once regardless of size, and empty groups
/// contribute a rate of zero.
pub fn average_survival_by_age_band(demographics: &Demographics) -> Vec<(AgeBand, f64)> {
    AgeBand::ALL
        .iter()
        .map(|&band| {
            let rates: Vec<f64> = demographics
                .rows
                .iter()
                .filter(|r| r.age_band == band)
                .map(|r| r.counts.survival_rate)
                .collect();

            let mean = if rates.is_empty() {
                0.0
            } else {
                rates.iter().sum::<f64>() / rates.len() as f64
            };

            (band, mean)
        })
        .collect()
}

/// The age band with the highest average survival rate.
///
/// Ties go to the earlier band. Returns `None` when no band has any
/// survivors, since there is then nothing to single out.
pub fn best_surviving_age_band(demographics: &Demographics) -> Option<(AgeBand, f64)> {
    average_survival_by_age_band(demographics)
        .into_iter()
        .filter(|&(_, rate)| rate > 0.0)
        .fold(None, |best, (band, rate)| match best {
            Some((_, best_rate)) if best_rate >= rate => best,
            _ => Some((band, rate)),
        })
}

/// Family size including the passenger, if both relative counts are known.
///
/// Counts too large to add up are treated as unknown.
pub fn family_size(passenger: &Passenger) -> Option<u32> {
    passenger
        .siblings_spouses?
        .checked_add(passenger.parents_children?)?
        .checked_add(1)
}

/// Running fare statistics for one family group.
#[derive(Debug, Clone, Copy, Default)]
struct FareTally {
    passengers: usize,
    fares: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl FareTally {
    fn add(&mut self, fare: Option<f64>) {
        self.passengers += 1;

        if let Some(fare) = fare {
            self.fares += 1;
            self.sum += fare;
            self.min = Some(self.min.map_or(fare, |m| m.min(fare)));
            self.max = Some(self.max.map_or(fare, |m| m.max(fare)));
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.fares > 0).then(|| self.sum / self.fares as f64)
    }
}

/// Fare statistics for every observed (family size, class) combination.
///
/// Only combinations present in the data appear. Passengers whose family
/// size is unknown are skipped; passengers with no fare count towards
/// `n_passengers` but not towards the fare statistics. Rows are sorted by
/// class, then family size.
pub fn family_groups(passengers: &[Passenger]) -> Vec<FamilyRow> {
    let mut grouped: BTreeMap<(PassengerClass, u32), FareTally> = BTreeMap::new();

    for p in passengers {
        if let Some(size) = family_size(p) {
            grouped.entry((p.class, size)).or_default().add(p.fare);
        }
    }

    grouped
        .into_iter()
        .map(|((class, family_size), tally)| FamilyRow {
            family_size,
            class,
            n_passengers: tally.passengers,
            avg_fare: tally.mean(),
            min_fare: tally.min,
            max_fare: tally.max,
        })
        .collect()
}

/// Passenger counts per family size, summed across classes, ascending by size.
pub fn passengers_by_family_size(rows: &[FamilyRow]) -> Vec<(u32, usize)> {
    let mut totals: BTreeMap<u32, usize> = BTreeMap::new();

    for row in rows {
        *totals.entry(row.family_size).or_default() += row.n_passengers;
    }

    totals.into_iter().collect()
}

/// Extract the last name: everything before the first comma, trimmed.
///
/// A name without a comma is returned whole.
pub fn last_name(name: &str) -> &str {
    name.split_once(',').map_or(name, |(last, _)| last).trim()
}

/// Occurrences of each last name, most common first.
///
/// Ties are broken alphabetically so the output is deterministic.
pub fn last_name_counts(passengers: &[Passenger]) -> Vec<LastNameCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for p in passengers {
        *counts.entry(last_name(&p.name)).or_default() += 1;
    }

    let mut sorted: Vec<LastNameCount> = counts
        .into_iter()
        .map(|(last_name, count)| LastNameCount {
            last_name: last_name.to_string(),
            count,
        })
        .collect();

    sorted.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.last_name.cmp(&b.last_name))
    });

    sorted
}

/// The `n` most common last names.
pub fn top_last_names(counts: &[LastNameCount], n: usize) -> Vec<LastNameCount> {
    counts.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(
        id: u32,
        class: PassengerClass,
        sex: Sex,
        age: Option<f64>,
        survived: bool,
    ) -> Passenger {
        Passenger {
            passenger_id: id,
            survived,
            class,
            sex,
            age,
            siblings_spouses: Some(0),
            parents_children: Some(0),
            fare: Some(10.0),
            name: format!("Doe{}, Mr. John", id),
        }
    }

    fn four_passengers() -> Vec<Passenger> {
        vec![
            passenger(1, PassengerClass::First, Sex::Female, Some(30.0), true),
            passenger(2, PassengerClass::First, Sex::Female, Some(30.0), false),
            passenger(3, PassengerClass::Third, Sex::Male, Some(8.0), true),
            passenger(4, PassengerClass::Third, Sex::Male, Some(8.0), true),
        ]
    }

    fn find(
        demo: &Demographics,
        class: PassengerClass,
        sex: Sex,
        band: AgeBand,
    ) -> &DemographicRow {
        demo.rows
            .iter()
            .find(|r| r.class == class && r.sex == sex && r.age_band == band)
            .unwrap()
    }

    #[test]
    fn test_demographics_worked_example() {
        let demo = survival_demographics(&four_passengers());

        assert_eq!(demo.rows.len(), 24);

        let adult = find(&demo, PassengerClass::First, Sex::Female, AgeBand::Adult);
        assert_eq!(adult.counts.n_passengers, 2);
        assert_eq!(adult.counts.n_survivors, 1);
        assert_eq!(adult.counts.survival_rate, 0.5);

        let child = find(&demo, PassengerClass::Third, Sex::Male, AgeBand::Child);
        assert_eq!(child.counts.n_passengers, 2);
        assert_eq!(child.counts.n_survivors, 2);
        assert_eq!(child.counts.survival_rate, 1.0);

        let empty: Vec<_> = demo
            .rows
            .iter()
            .filter(|r| r.counts.n_passengers == 0)
            .collect();
        assert_eq!(empty.len(), 22);
        assert!(empty.iter().all(|r| r.counts.survival_rate == 0.0));
    }

    #[test]
    fn test_demographics_row_order() {
        let demo = survival_demographics(&[]);

        assert_eq!(demo.rows.len(), 24);
        assert_eq!(demo.unknown_age.len(), 6);

        let first = &demo.rows[0];
        assert_eq!(
            (first.class, first.sex, first.age_band),
            (PassengerClass::First, Sex::Female, AgeBand::Child)
        );

        let bands: Vec<AgeBand> = demo.rows[..4].iter().map(|r| r.age_band).collect();
        assert_eq!(bands, AgeBand::ALL.to_vec());

        let last = &demo.rows[23];
        assert_eq!(
            (last.class, last.sex, last.age_band),
            (PassengerClass::Third, Sex::Male, AgeBand::Senior)
        );

        let keys: Vec<_> = demo
            .rows
            .iter()
            .map(|r| (r.class, r.sex, r.age_band))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_demographics_order_independent() {
        let forward = four_passengers();
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            survival_demographics(&forward),
            survival_demographics(&reversed)
        );
    }

    #[test]
    fn test_demographics_rates_in_range() {
        let mut passengers = four_passengers();
        let senior = passenger(5, PassengerClass::Second, Sex::Male, Some(70.0), false);
        let teen = passenger(6, PassengerClass::Second, Sex::Female, Some(15.0), true);
        passengers.push(senior);
        passengers.push(teen);

        let demo = survival_demographics(&passengers);
        for row in &demo.rows {
            assert!((0.0..=1.0).contains(&row.counts.survival_rate));
            if row.counts.n_passengers == 0 {
                assert_eq!(row.counts.survival_rate, 0.0);
            }
        }
    }

    #[test]
    fn test_missing_age_goes_to_unknown_bucket() {
        let mut passengers = four_passengers();
        passengers.push(passenger(5, PassengerClass::Third, Sex::Male, None, false));
        passengers.push(passenger(6, PassengerClass::Third, Sex::Male, None, true));

        let demo = survival_demographics(&passengers);

        let banded: usize = demo.rows.iter().map(|r| r.counts.n_passengers).sum();
        assert_eq!(banded, 4);
        assert_eq!(demo.unknown_age_total(), 2);

        let unknown = demo
            .unknown_age
            .iter()
            .find(|r| r.class == PassengerClass::Third && r.sex == Sex::Male)
            .unwrap();
        assert_eq!(unknown.counts.n_survivors, 1);
        assert_eq!(unknown.counts.survival_rate, 0.5);
    }

    #[test]
    fn test_age_twelve_is_teen() {
        let p = passenger(1, PassengerClass::Second, Sex::Female, Some(12.0), true);
        let demo = survival_demographics(&[p]);

        let teen = find(&demo, PassengerClass::Second, Sex::Female, AgeBand::Teen);
        assert_eq!(teen.counts.n_passengers, 1);
    }

    #[test]
    fn test_average_survival_by_age_band() {
        let demo = survival_demographics(&four_passengers());
        let averages = average_survival_by_age_band(&demo);

        assert_eq!(averages.len(), 4);
        assert_eq!(averages[0].0, AgeBand::Child);
        // One of six Child groups has rate 1.0.
        assert!((averages[0].1 - 1.0 / 6.0).abs() < 1e-12);
        // One of six Adult groups has rate 0.5.
        assert!((averages[2].1 - 0.5 / 6.0).abs() < 1e-12);
        assert_eq!(averages[1].1, 0.0);
        assert_eq!(averages[3].1, 0.0);

        let (best, _) = best_surviving_age_band(&demo).unwrap();
        assert_eq!(best, AgeBand::Child);
    }

    #[test]
    fn test_best_band_none_without_survivors() {
        let mut passengers = four_passengers();
        for p in &mut passengers {
            p.survived = false;
        }

        let demo = survival_demographics(&passengers);
        assert_eq!(best_surviving_age_band(&demo), None);
        assert_eq!(best_surviving_age_band(&survival_demographics(&[])), None);
    }

    #[test]
    fn test_family_size() {
        let mut p = passenger(1, PassengerClass::First, Sex::Male, Some(40.0), false);
        p.siblings_spouses = Some(1);
        p.parents_children = Some(2);
        assert_eq!(family_size(&p), Some(4));

        p.parents_children = None;
        assert_eq!(family_size(&p), None);
    }

    #[test]
    fn test_family_size_overflow_is_unknown() {
        let mut p = passenger(1, PassengerClass::Third, Sex::Male, Some(40.0), false);
        p.siblings_spouses = Some(u32::MAX);
        p.parents_children = Some(0);
        assert_eq!(family_size(&p), None);

        p.siblings_spouses = Some(u32::MAX - 1);
        p.parents_children = Some(1);
        assert_eq!(family_size(&p), None);

        p.siblings_spouses = Some(u32::MAX - 1);
        p.parents_children = Some(0);
        assert_eq!(family_size(&p), Some(u32::MAX));

        // The oversized passenger is skipped rather than grouped.
        let mut q = passenger(2, PassengerClass::Third, Sex::Male, Some(40.0), false);
        q.siblings_spouses = Some(u32::MAX);
        let rows = family_groups(&[q]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_family_groups() {
        let mut a = passenger(1, PassengerClass::Third, Sex::Male, Some(40.0), false);
        a.siblings_spouses = Some(1);
        a.fare = Some(20.0);
        let mut b = passenger(2, PassengerClass::Third, Sex::Female, Some(38.0), true);
        b.siblings_spouses = Some(1);
        b.fare = Some(10.0);
        let mut c = passenger(3, PassengerClass::Third, Sex::Female, Some(8.0), true);
        c.parents_children = Some(1);
        c.fare = None;
        let mut d = passenger(4, PassengerClass::First, Sex::Male, Some(50.0), false);
        d.fare = Some(100.0);
        let mut e = passenger(5, PassengerClass::First, Sex::Male, Some(50.0), false);
        e.siblings_spouses = None;

        let rows = family_groups(&[a, b, c, d, e]);

        // First class sorts before third; the unknown family size is skipped.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].class, PassengerClass::First);
        assert_eq!(rows[0].family_size, 1);
        assert_eq!(rows[0].avg_fare, Some(100.0));

        let third = &rows[1];
        assert_eq!(third.family_size, 2);
        assert_eq!(third.n_passengers, 3);
        assert_eq!(third.avg_fare, Some(15.0));
        assert_eq!(third.min_fare, Some(10.0));
        assert_eq!(third.max_fare, Some(20.0));

        let total: usize = rows.iter().map(|r| r.n_passengers).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_family_group_without_fares() {
        let mut p = passenger(1, PassengerClass::Second, Sex::Male, Some(40.0), false);
        p.fare = None;

        let rows = family_groups(&[p]);
        assert_eq!(rows[0].n_passengers, 1);
        assert_eq!(rows[0].avg_fare, None);
        assert_eq!(rows[0].min_fare, None);
        assert_eq!(rows[0].max_fare, None);
    }

    #[test]
    fn test_passengers_by_family_size() {
        let mut passengers = four_passengers();
        passengers[0].siblings_spouses = Some(2);
        let rows = family_groups(&passengers);

        assert_eq!(passengers_by_family_size(&rows), vec![(1, 3), (3, 1)]);
    }

    #[test]
    fn test_last_name() {
        assert_eq!(last_name("Smith, John"), "Smith");
        assert_eq!(last_name("Braund, Mr. Owen Harris"), "Braund");
        assert_eq!(
            last_name("de Messemaeker, Mr. Guillaume, Jr"),
            "de Messemaeker"
        );
        assert_eq!(last_name("Cher"), "Cher");
    }

    #[test]
    fn test_last_name_counts() {
        let mut passengers = four_passengers();
        passengers[0].name = "Smith, Mr. John".to_string();
        passengers[1].name = "Smith, Mrs. Jane".to_string();
        passengers[2].name = "Andersson, Master. Sigvard".to_string();
        passengers[3].name = "Brown".to_string();

        let counts = last_name_counts(&passengers);

        assert_eq!(counts[0].last_name, "Smith");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].last_name, "Andersson");
        assert_eq!(counts[2].last_name, "Brown");

        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, passengers.len());

        let top = top_last_names(&counts, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].last_name, "Smith");
    }
}
